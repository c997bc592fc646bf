//! # Languages and Starter Templates
//!
//! The closed set of languages the backend can compile or interpret, and the
//! starter program each one seeds the editor with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PYTHON_TEMPLATE: &str = r#"def calculate_sum(n):
    # This loop calculates the sum of numbers from 1 to n
    total = 0
    for i in range(n + 1):
        total += i
    return total

print(calculate_sum(10))"#;

const JAVA_TEMPLATE: &str = r#"public class Main {
    // Finds the largest element in an array
    public static int findMax(int[] arr) {
        int max = arr[0]; // Assume first element is max
        for (int i = 1; i < arr.length; i++) {
            if (arr[i] > max) {
                max = arr[i]; // Update max if current element is greater
            }
        }
        return max;
    }
    public static void main(String[] args) {
        int[] numbers = {10, 50, 30, 20, 40};
        System.out.println("Max is: " + findMax(numbers));
    }
}"#;

const C_TEMPLATE: &str = r#"#include <stdio.h>

int main() {
    printf("Hello, Smart Compile!\n");
    return 0;
}"#;

const CPP_TEMPLATE: &str = r#"#include <iostream>

int main() {
    std::cout << "Hello, Smart Compile!" << std::endl;
    return 0;
}"#;

/// Source language understood by the backend
///
/// Serialized as the exact identifiers the backend expects
/// (`python`, `java`, `c`, `cpp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Java,
    C,
    Cpp,
}

impl Language {
    /// Every supported language, in the order the selector lists them
    pub const ALL: [Language; 4] = [Language::Python, Language::Java, Language::C, Language::Cpp];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }

    /// Human readable name shown in the language selector
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::Java => "Java",
            Language::C => "C",
            Language::Cpp => "C++",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a supported language
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language '{0}' (expected one of: python, java, c, cpp)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "cpp" | "c++" => Ok(Language::Cpp),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Starter source text for a language
pub fn default_template(language: Language) -> &'static str {
    match language {
        Language::Python => PYTHON_TEMPLATE,
        Language::Java => JAVA_TEMPLATE,
        Language::C => C_TEMPLATE,
        Language::Cpp => CPP_TEMPLATE,
    }
}

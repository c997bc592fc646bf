use crate::repl::models::Language;
use std::ffi::OsString;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Profile to read the backend settings from. Default is 'default'.
    /// If the profile is not configured, the built-in defaults are used.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Backend URL
    /// Optional. Overrides the server configured in the profile.
    #[clap(short = 's', long, help = "backend URL, e.g. http://127.0.0.1:5000")]
    server: Option<String>,

    /// Initial language
    #[clap(
        short = 'l',
        long,
        default_value = "python",
        help = "initial language (python, java, c, cpp)"
    )]
    language: Language,

    /// Verbose mode
    /// Optional. Log debug messages to stderr.
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    server: Option<String>,
    language: Language,
    verbose: bool,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    fn from_clap(args: ClapArgs) -> Self {
        Self {
            profile: args.profile,
            server: args.server,
            language: args.language,
            verbose: args.verbose,
        }
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

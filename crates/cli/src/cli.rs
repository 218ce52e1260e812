use std::{fmt, path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand};
use overlay::user::UserArg;

/// Overlay - inspect and change the state of overlay packages
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct ClapCli {
    /// Override the registry state file from config
    ///
    #[clap(long, short = 's', global = true)]
    pub(crate) state_file: Option<PathBuf>,

    /// Log debug output to stderr
    ///
    #[clap(long, global = true, default_value_t = false)]
    pub(crate) debug: bool,

    /// Disable colored output
    ///
    #[clap(long, global = true, default_value_t = false)]
    pub(crate) no_color: bool,

    /// Subcommand to execute
    ///
    #[clap(subcommand)]
    pub(crate) command: ClapCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum ClapCommands {
    /// Print target and overlay packages in priority order
    ///
    List {
        #[clap(flatten)]
        user: UserOpt,

        /// Limit output to this target or overlay package
        package_name: Option<String>,
    },

    /// Enable an overlay package
    Enable {
        #[clap(flatten)]
        user: UserOpt,

        package_name: String,
    },

    /// Disable an overlay package
    Disable {
        #[clap(flatten)]
        user: UserOpt,

        package_name: String,
    },

    /// Enable an overlay package and disable all other overlays for its target
    EnableExclusive {
        #[clap(flatten)]
        user: UserOpt,

        /// Only disable other overlays in the same category
        #[clap(long, default_value_t = false)]
        category: bool,

        package_name: String,
    },

    /// Give an overlay package a priority just above PARENT, or the lowest or highest priority
    SetPriority {
        #[clap(flatten)]
        user: UserOpt,

        package_name: String,

        /// Parent package name, `lowest` or `highest`
        parent: PriorityTarget,
    },

    /// Print the value of a resource with the enabled overlays applied
    Lookup {
        #[clap(flatten)]
        user: UserOpt,

        /// Also print how the value was resolved
        #[clap(long, default_value_t = false)]
        verbose: bool,

        /// Package whose view of the resource is printed
        package_to_load: String,

        /// Resource reference as PACKAGE:TYPE/NAME
        resource: String,
    },

    /// Apply several enable/disable operations as one transaction
    Commit {
        #[clap(flatten)]
        user: UserOpt,

        /// Operations in order, each `enable=PACKAGE` or `disable=PACKAGE`
        #[clap(required = true)]
        operations: Vec<CommitOp>,
    },
}

#[derive(Args, Debug, Clone)]
pub(crate) struct UserOpt {
    /// User id, or `current`/`cur` for the configured default user
    #[clap(long)]
    pub(crate) user: Option<UserArg>,
}

/// Second argument of `set-priority`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PriorityTarget {
    Lowest,
    Highest,
    Parent(String),
}

impl FromStr for PriorityTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "lowest" => Self::Lowest,
            "highest" => Self::Highest,
            parent => Self::Parent(parent.to_string()),
        })
    }
}

/// One operation of the `commit` subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommitOp {
    pub(crate) enable: bool,
    pub(crate) package_name: String,
}

impl FromStr for CommitOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, package_name) = s
            .split_once('=')
            .ok_or_else(|| format!("expected enable=PACKAGE or disable=PACKAGE, got `{s}`"))?;

        let enable = match action {
            "enable" => true,
            "disable" => false,
            other => return Err(format!("unknown operation `{other}`")),
        };

        Ok(Self {
            enable,
            package_name: package_name.to_string(),
        })
    }
}

impl fmt::Display for CommitOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.enable { "enable" } else { "disable" };
        write!(f, "{action}={}", self.package_name)
    }
}

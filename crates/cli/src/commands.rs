//! CLI subcommands.

use std::fmt;

use clap::Subcommand;
use corelib::{HashRing, ServerName};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve keys to the servers that own them
    Lookup {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print every occupied ring position in order
    Show,
    /// Print the share of the hash space owned by each server
    Ownership,
    /// List member servers
    Servers,
}

/// Output of a command, rendered one item per line.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Assignments(Vec<(String, ServerName)>),
    Ring(String),
    Ownership(Vec<(ServerName, f64)>),
    Servers(Vec<ServerName>),
}

impl Command {
    pub fn execute(&self, ring: &HashRing) -> corelib::Result<CommandResult> {
        match self {
            Command::Lookup { keys } => {
                let assignments = keys
                    .iter()
                    .map(|key| Ok((key.clone(), ring.get(key)?)))
                    .collect::<corelib::Result<Vec<_>>>()?;
                Ok(CommandResult::Assignments(assignments))
            }
            Command::Show => Ok(CommandResult::Ring(ring.to_string())),
            Command::Ownership => Ok(CommandResult::Ownership(
                ring.topology().ownership().into_iter().collect(),
            )),
            Command::Servers => {
                let mut servers = ring.list_servers();
                servers.sort();
                Ok(CommandResult::Servers(servers))
            }
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Assignments(assignments) => {
                for (key, server) in assignments {
                    writeln!(f, "{key}\t{server}")?;
                }
            }
            CommandResult::Ring(rendered) => writeln!(f, "{rendered}")?,
            CommandResult::Ownership(shares) => {
                for (server, share) in shares {
                    writeln!(f, "{server}\t{:.2}%", share * 100.0)?;
                }
            }
            CommandResult::Servers(servers) => {
                for server in servers {
                    writeln!(f, "{server}")?;
                }
            }
        }
        Ok(())
    }
}

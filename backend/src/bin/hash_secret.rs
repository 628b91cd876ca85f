//! Hash a login secret into the PHC string stored in the identity file.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Read};

use clap::Parser;
use directory_backend::domain::{Handle, Role, SecretHash};
use serde_json::{Map, json};
use zeroize::Zeroizing;

/// `hash-secret` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hash-secret",
    about = "Hash a login secret for the directory identity file",
    version
)]
struct CliArgs {
    /// Secret to hash. Read from stdin when omitted.
    #[arg(long, value_name = "secret")]
    secret: Option<String>,
    /// Print a complete identity entry for this handle instead of the bare hash.
    #[arg(long, value_name = "handle", requires_all = ["role", "display_name"])]
    handle: Option<String>,
    /// Role of the identity entry: `admin` or `employee`.
    #[arg(long, value_name = "role", value_parser = parse_role)]
    role: Option<Role>,
    /// Display name of the identity entry.
    #[arg(long = "display-name", value_name = "name")]
    display_name: Option<String>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    match raw {
        "admin" => Ok(Role::Admin),
        "employee" => Ok(Role::Employee),
        other => Err(format!("unknown role `{other}`; expected admin or employee")),
    }
}

fn read_secret(arg: Option<String>) -> io::Result<Zeroizing<String>> {
    if let Some(secret) = arg {
        return Ok(Zeroizing::new(secret));
    }
    let mut buf = Zeroizing::new(String::new());
    io::stdin().read_to_string(&mut buf)?;
    let trimmed = buf.trim_end_matches(['\r', '\n']).len();
    buf.truncate(trimmed);
    Ok(buf)
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let secret = read_secret(args.secret)?;
    if secret.is_empty() {
        return Err(io::Error::other("secret must not be empty"));
    }
    let hash = SecretHash::derive(secret.as_str()).map_err(io::Error::other)?;

    match (args.handle, args.role, args.display_name) {
        (Some(handle), Some(role), Some(display_name)) => {
            let handle = Handle::new(&handle).map_err(io::Error::other)?;
            let mut entry = Map::new();
            entry.insert(
                handle.to_string(),
                json!({
                    "secretHash": hash.as_phc(),
                    "role": role,
                    "displayName": display_name,
                }),
            );
            let rendered = serde_json::to_string_pretty(&entry).map_err(io::Error::other)?;
            println!("{rendered}");
        }
        _ => println!("{}", hash.as_phc()),
    }
    Ok(())
}

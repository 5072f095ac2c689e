//! The `auth` command family.

use std::fmt::Write as _;

use camino::Utf8Path;
use lingo_config::{AUTH_FILE_NAME, AuthKey, AuthStore, Config, create_auth_file_in_dir};

use crate::cli::AuthAction;
use crate::errors::AppError;

const MASK: &str = "********";

/// Executes `action` against the auth store and returns the message to print.
pub(crate) fn run_auth(action: &AuthAction, config: &Config) -> Result<String, AppError> {
    let home = config.config_home()?;
    match action {
        AuthAction::Init { overwrite } => init(&home, *overwrite),
        AuthAction::Dump => {
            let store = AuthStore::open_in_dir(&home, config.environment())?;
            Ok(dump(&store))
        }
        AuthAction::Get { key } => {
            let store = AuthStore::open_in_dir(&home, config.environment())?;
            Ok(store.get(*key)?.to_owned())
        }
        AuthAction::Set { key, value } => {
            let mut store = AuthStore::open_in_dir(&home, config.environment())?;
            store.set(*key, value.as_str());
            store.save()?;
            Ok(format!(
                "{} updated for the {} environment",
                key.dotted_path(),
                store.environment()
            ))
        }
    }
}

fn init(home: &Utf8Path, overwrite: bool) -> Result<String, AppError> {
    let existed = home.join(AUTH_FILE_NAME).exists();
    let path = create_auth_file_in_dir(home, overwrite)?;
    Ok(if existed && !overwrite {
        format!("Auth store {path} already exists; pass --overwrite to replace it")
    } else {
        format!("Auth store written to {path}")
    })
}

fn dump(store: &AuthStore) -> String {
    let mut text = String::new();
    for (key, value) in store.dump() {
        let shown = display_value(key, &value);
        // Writing into a String cannot fail.
        let _ = writeln!(text, "{}: {shown}", key.dotted_path());
    }
    text
}

fn display_value(key: AuthKey, value: &str) -> &str {
    if key.is_secret() && !value.is_empty() {
        MASK
    } else {
        value
    }
}

//! Unitas Server
//!
//! Line-oriented JSON front end for the unit engine. One request object per
//! line on stdin, one response per line on stdout. Logs go to stderr.
//!
//! Environment:
//! - RUST_LOG: log filter (default: info)
//! - UNITAS_CATALOGUE: path of a JSON locale catalogue
//! - UNITAS_BUILTIN, UNITAS_SI_PREFIXES, UNITAS_LOCALE: registry configuration

mod handlers;
mod protocol;

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use unitas_units::{LocaleCatalogue, RegistryConfig, UnitRegistry};

use handlers::Server;
use protocol::{codes, Request, Response, RpcError};

const SERVER_NAME: &str = "unitas";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const ENV_CATALOGUE: &str = "UNITAS_CATALOGUE";

/// Catalogue path from the environment, if any
fn catalogue_path() -> Option<PathBuf> {
    env::var_os(ENV_CATALOGUE)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

/// Read and validate a locale catalogue against the registry
fn load_catalogue(registry: &UnitRegistry, path: &Path) -> Result<LocaleCatalogue, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let catalogue: LocaleCatalogue = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid catalogue '{}': {}", path.display(), e))?;
    let report = catalogue.validate(registry).map_err(|e| e.to_string())?;
    info!(
        path = %path.display(),
        checked = report.checked,
        skipped = report.skipped.len(),
        "loaded locale catalogue"
    );
    Ok(catalogue)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_tracing();

    let config = RegistryConfig::from_env();
    let registry = UnitRegistry::from_config(&config);

    let catalogue = match catalogue_path() {
        Some(path) => match load_catalogue(&registry, &path) {
            Ok(catalogue) => catalogue,
            Err(e) => {
                error!(error = %e, "cannot load locale catalogue");
                process::exit(1);
            }
        },
        None => LocaleCatalogue::new(),
    };

    info!(
        version = SERVER_VERSION,
        quantities = registry.quantities().len(),
        locale = %config.default_locale,
        "{} server started",
        SERVER_NAME
    );

    let server = Server::new(registry, catalogue);
    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = serve(&server, stdin.lock(), stdout.lock()) {
        error!(error = %e, "I/O error");
    }

    info!("Server shutting down");
}

/// Request loop until EOF. Notifications are handled but not answered.
fn serve<R: BufRead, W: Write>(server: &Server, reader: R, mut writer: W) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "received request");

        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                let response = server.handle_request(&request);
                if request.is_notification() {
                    debug!(method = %request.method, "notification processed (no response)");
                    continue;
                }
                response
            }
            Err(e) => {
                warn!(error = %e, "error parsing request");
                Response::err(
                    None,
                    RpcError::new(codes::PARSE_REQUEST, format!("Parse error: {}", e)),
                )
            }
        };

        let response_json = serde_json::to_string(&response)?;
        writeln!(writer, "{}", response_json)?;
        writer.flush()?;
    }

    info!("Client disconnected (EOF)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as JsonValue};

    fn run(input: &str) -> Vec<JsonValue> {
        let server = Server::new(UnitRegistry::with_builtin(), LocaleCatalogue::new());
        let mut output = Vec::new();
        serve(&server, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_one_response_per_request() {
        let responses = run(concat!(
            "{\"id\": 1, \"method\": \"ping\"}\n",
            "\n",
            "{\"id\": \"two\", \"method\": \"convert\", \"params\": {\"quantity\": \"Length\", \"value\": \"3 ft to m\"}}\n",
        ));
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0], json!({"id": 1, "result": {}}));
        assert_eq!(responses[1]["id"], "two");
        assert_eq!(responses[1]["result"]["unit"], "m");
    }

    #[test]
    fn test_notification_gets_no_response() {
        let responses = run(concat!(
            "{\"method\": \"define_unit\", \"params\": {\"quantity\": \"Length\", \"key\": \"fur\", \"factor\": 201.168}}\n",
            "{\"id\": 2, \"method\": \"parse\", \"params\": {\"quantity\": \"Length\", \"text\": \"1 fur\"}}\n",
        ));
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["result"]["si"], 201.168);
    }

    #[test]
    fn test_malformed_line() {
        let responses = run("not json\n{\"id\": 3, \"method\": \"ping\"}\n");
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], codes::PARSE_REQUEST);
        assert!(responses[0].get("id").is_none());
        assert_eq!(responses[1]["id"], 3);
    }

    #[test]
    fn test_load_catalogue() {
        let registry = UnitRegistry::with_builtin();
        let dir = env::temp_dir().join(format!("unitas-server-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();

        let good = dir.join("de.json");
        fs::write(&good, r#"{"de": {"unit.Duration.h.abbr": "Std"}}"#).unwrap();
        let catalogue = load_catalogue(&registry, &good).unwrap();
        assert_eq!(catalogue.locales().collect::<Vec<_>>(), vec!["de"]);

        let bad = dir.join("bad.json");
        fs::write(&bad, r#"{"de": {"unit.Volume.fl.oz(UK).abbr": "x"}}"#).unwrap();
        assert!(load_catalogue(&registry, &bad).is_err());

        assert!(load_catalogue(&registry, &dir.join("missing.json")).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}

/*
    casexport: token-aligned export of INCEpTION CAS XMI annotations
        by Maarten van Gompel <proycon@anaproy.nl>
        Digital Infrastucture, KNAW Humanities Cluster

        Licensed under the GNU General Public License v3
*/

use std::process::exit;

use casexport::{run, Config};

fn main() {
    //reads typesystem.xml and admin.xmi from the current directory
    let config = Config::default();
    let level = if config.debug() { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    match run(config) {
        Ok(_) => println!("Annotations saved successfully!"),
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    }
}

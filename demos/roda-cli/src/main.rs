mod cli;
mod dictionary;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use cli::{Cli, Commands};
use roda_client::{NullNotifiable, RodaClient};
use roda_proto::{AccessKind, Attributes};
use roda_transport::{LoopbackEndpoint, Readiness, RodaEndpoint};

const CLIENT_OWNER_ID: u32 = 1;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let timeout = Duration::from_millis(cli.timeout_ms);

    let endpoint: Arc<dyn RodaEndpoint> = Arc::new(LoopbackEndpoint::new());
    dictionary::spawn(endpoint.clone());

    let proposed = Readiness {
        max_request_size: 4096,
        max_response_size: cli.max_response_size,
    };
    let client = match RodaClient::connect(
        endpoint,
        CLIENT_OWNER_ID,
        Arc::new(NullNotifiable),
        proposed,
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to connect: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Ping(_) => client.ping(cli.max_response_size, timeout).map(|()| {
            println!("pong");
        }),
        Commands::Read(cmd) => client
            .read(
                AccessKind::SingleSubindex,
                cmd.index,
                cmd.subindex,
                Attributes::new().with_readable(true),
                cli.max_response_size,
                timeout,
            )
            .map(|data| {
                println!(
                    "{:#06x}:{} = {}",
                    cmd.index,
                    cmd.subindex,
                    format_bytes(&data)
                );
            }),
        Commands::Write(cmd) => {
            let data = cmd.value.clone().into_bytes();
            let size_in_bit = data.len() as u32 * 8;
            client
                .write(
                    AccessKind::SingleSubindex,
                    cmd.index,
                    cmd.subindex,
                    Attributes::new().with_writable(true),
                    size_in_bit,
                    data,
                    cli.max_response_size,
                    timeout,
                )
                .map(|()| {
                    println!("{:#06x}:{} written", cmd.index, cmd.subindex);
                })
        }
        Commands::Enumerate(cmd) => client
            .enumerate_objects(
                cmd.first_index,
                cmd.last_index,
                0,
                cli.max_response_size,
                timeout,
            )
            .map(|indices| {
                for index in indices {
                    println!("{index:#06x}");
                }
            }),
        Commands::Info(cmd) => client
            .object_info(
                cmd.index,
                cmd.first_subindex,
                cmd.last_subindex,
                true,
                false,
                cli.max_response_size,
                timeout,
            )
            .map(|subindices| {
                for entry in subindices {
                    println!(
                        "{:#06x}:{} {:?} {}",
                        cmd.index,
                        entry.subindex,
                        entry.data_type,
                        entry.name.as_deref().unwrap_or("")
                    );
                }
            }),
    };

    client.disconnect();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("request failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn format_bytes(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(s) if s.chars().all(|c| !c.is_control()) => s.to_string(),
        _ => data
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

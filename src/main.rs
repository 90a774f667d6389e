// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use evm_simulator::artifact::{
    decode_bytecode, load_bytecode_from_path, strip_hex_prefix, ArtifactError,
};
use evm_simulator::bindings::deploy_contract;
use evm_simulator::bindings::nopush0::NOPUSH0_BIN;
use evm_simulator::opcodes::check_compatibility;
use evm_simulator::types::{DeploymentRequest, DeploymentResponse};
use evm_simulator::{Hardfork, SimConfig, SimError, SimulatedBackend, U256};
use std::env;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Deploy EVM creation code on a simulated chain. Reads a JSON deployment
/// request on stdin and writes a JSON outcome to stdout.
#[derive(Parser, Debug)]
#[command(name = "simulator")]
struct Cli {
    /// Hardfork to simulate; overrides the request and EVMSIM_HARDFORK.
    #[arg(long)]
    hardfork: Option<Hardfork>,

    /// Path to a hex `.bin` file with the creation code.
    #[arg(long)]
    artifact: Option<PathBuf>,
}

fn init_logger() {
    let use_json = env::var("EVMSIM_LOG_FORMAT")
        .map(|val| val.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the response, so logs go to stderr.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if use_json {
        subscriber.json().flatten_event(true).init();
    } else {
        subscriber.compact().init();
    }
}

fn emit(response: &DeploymentResponse) {
    match serde_json::to_string(response) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "failed to serialize response"),
    }
}

fn main() {
    init_logger();
    let cli = Cli::parse();

    let mut buffer = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buffer) {
        let response = DeploymentResponse::failure(
            Hardfork::default(),
            "request",
            format!("Failed to read stdin: {}", e),
            vec![],
        );
        emit(&response);
        std::process::exit(1);
    }

    let request = if buffer.trim().is_empty() {
        DeploymentRequest::default()
    } else {
        match serde_json::from_str(&buffer) {
            Ok(req) => req,
            Err(e) => {
                let response = DeploymentResponse::failure(
                    Hardfork::default(),
                    "request",
                    format!("Invalid JSON: {}", e),
                    vec![],
                );
                emit(&response);
                std::process::exit(1);
            }
        }
    };

    let response = run(&cli, request);
    emit(&response);
    if response.status != "success" {
        std::process::exit(1);
    }
}

fn run(cli: &Cli, request: DeploymentRequest) -> DeploymentResponse {
    let mut config = request.config.clone().unwrap_or_else(SimConfig::from_env);
    if let Some(fork) = cli.hardfork.or(request.hardfork) {
        config.hardfork = fork;
    }
    let hardfork = config.hardfork;
    let mut logs = vec![format!("Simulating hardfork: {}", hardfork)];

    let bytecode = match load_bytecode(cli, &request) {
        Ok(code) => code,
        Err(e) => return DeploymentResponse::from_error(hardfork, &e.into(), logs),
    };
    logs.push(format!("Loaded {} bytes of creation code", bytecode.len()));

    if request.static_check {
        if let Err(invalid) = check_compatibility(&bytecode, hardfork) {
            logs.push(format!("Static check failed at pc {}", invalid.pc));
            return DeploymentResponse::from_error(hardfork, &SimError::from(invalid), logs);
        }
        logs.push("Static opcode check passed".to_string());
    }

    let args = match request.constructor_args.as_deref().map(decode_hex_field) {
        Some(Ok(args)) => args,
        Some(Err(e)) => return DeploymentResponse::from_error(hardfork, &e.into(), logs),
        None => Vec::new(),
    };

    let value = match request.value.as_deref() {
        Some(raw) => match U256::from_str_radix(raw.trim(), 10) {
            Ok(value) => value,
            Err(e) => {
                return DeploymentResponse::failure(
                    hardfork,
                    "request",
                    format!("Invalid value {:?}: {}", raw, e),
                    logs,
                )
            }
        },
        None => U256::ZERO,
    };

    let mut sim = SimulatedBackend::with_config(1, config);
    let opts = match sim.acc(0) {
        Ok(opts) => opts.with_value(value),
        Err(e) => return DeploymentResponse::from_error(hardfork, &e, logs),
    };

    match deploy_contract(&opts, &mut sim, &bytecode, &args) {
        Ok((address, tx)) => {
            let gas_used = sim.receipt(&tx.hash).map(|receipt| receipt.gas_used);
            info!(address = %address, hardfork = %sim.hardfork(), "deployment succeeded");
            logs.push(format!("Deployed at {}", address));
            DeploymentResponse {
                status: "success".to_string(),
                hardfork,
                error: None,
                error_code: None,
                opcode: None,
                pc: None,
                contract_address: Some(address.to_string()),
                transaction_hash: Some(tx.hash.to_string()),
                gas_used,
                logs,
            }
        }
        Err(e) => {
            error!(error = %e, hardfork = %hardfork, "deployment failed");
            DeploymentResponse::from_error(hardfork, &e, logs)
        }
    }
}

fn load_bytecode(cli: &Cli, request: &DeploymentRequest) -> Result<Vec<u8>, ArtifactError> {
    if let Some(path) = &cli.artifact {
        return load_bytecode_from_path(path);
    }
    match &request.bytecode {
        Some(text) => decode_bytecode(text),
        None => decode_bytecode(NOPUSH0_BIN),
    }
}

/// Hex that may legitimately be empty, unlike creation code.
fn decode_hex_field(text: &str) -> Result<Vec<u8>, ArtifactError> {
    Ok(hex::decode(strip_hex_prefix(text))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(hardfork: Option<Hardfork>) -> Cli {
        Cli {
            hardfork,
            artifact: None,
        }
    }

    fn bundled_request(hardfork: Option<Hardfork>) -> DeploymentRequest {
        DeploymentRequest {
            hardfork,
            constructor_args: Some(format!("{:0>64}", "42")),
            ..DeploymentRequest::default()
        }
    }

    #[test]
    fn test_bundled_contract_fails_on_default_fork() {
        let response = run(&cli(None), bundled_request(Some(Hardfork::Merge)));
        assert_eq!(response.status, "error");
        assert_eq!(response.error_code.as_deref(), Some("invalid_opcode"));
        assert_eq!(response.opcode.as_deref(), Some("PUSH0"));
        assert!(response.error.unwrap().contains("PUSH0"));
    }

    #[test]
    fn test_cli_hardfork_overrides_request() {
        let response = run(
            &cli(Some(Hardfork::Shanghai)),
            bundled_request(Some(Hardfork::London)),
        );
        assert_eq!(response.status, "success", "{:?}", response.error);
        assert_eq!(response.hardfork, Hardfork::Shanghai);
        assert!(response.contract_address.is_some());
        assert!(response.gas_used.unwrap() > 53_000);
    }

    #[test]
    fn test_static_check_rejects_unreachable_push0() {
        let request = DeploymentRequest {
            static_check: true,
            ..bundled_request(Some(Hardfork::Merge))
        };
        let response = run(&cli(None), request);
        assert_eq!(response.error_code.as_deref(), Some("invalid_opcode"));
        // The first PUSH0 sits in the non-payable guard, which a zero-value
        // deployment never reaches.
        assert_eq!(response.pc, Some(0x0c));
    }

    #[test]
    fn test_bad_inputs_are_reported() {
        let request = DeploymentRequest {
            bytecode: Some("0xnothex".to_string()),
            ..DeploymentRequest::default()
        };
        let response = run(&cli(None), request);
        assert_eq!(response.error_code.as_deref(), Some("artifact"));

        let request = DeploymentRequest {
            value: Some("lots".to_string()),
            ..bundled_request(Some(Hardfork::Shanghai))
        };
        let response = run(&cli(None), request);
        assert_eq!(response.error_code.as_deref(), Some("request"));
    }

    #[test]
    fn test_constructor_args_accept_uppercase_prefix() {
        let request = DeploymentRequest {
            constructor_args: Some(format!("0X{:0>64}", "42")),
            ..bundled_request(Some(Hardfork::Shanghai))
        };
        let response = run(&cli(None), request);
        assert_eq!(response.status, "success", "{:?}", response.error);
    }

    #[test]
    fn test_value_hits_non_payable_guard() {
        let request = DeploymentRequest {
            value: Some("1".to_string()),
            ..bundled_request(Some(Hardfork::Shanghai))
        };
        let response = run(&cli(None), request);
        assert_eq!(response.error_code.as_deref(), Some("reverted"));
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Run a demo two-layer network from configuration.
//!
//! Loads `spikenn.toml` (or defaults when none is found), runs the configured
//! number of ticks with activity written under `logging.activity_dir`, and
//! prints a JSON summary. `--snapshot <path>` also saves the final network.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use serde_json::json;
use spikenn::config::{
    apply_cli_overrides, apply_environment_overrides, load_config, validate_config, ConfigError,
    SpikennConfig,
};
use spikenn::engine::{ConnectionParams, FileLogSink, InputMode, Network};
use spikenn::neural::{LIFParameters, NeuronType};
use spikenn::observability::{debug_flags_help, init_logging, parse_debug_flags};
use spikenn::serialization::{save_network, SnapshotMetadata};
use tracing::info;

const INPUT_NEURONS: usize = 32;
const OUTPUT_EXCITATORY: usize = 8;
const OUTPUT_INHIBITORY: usize = 2;
const FAN_OUT: usize = 4;

struct Args {
    config: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    overrides: HashMap<String, String>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: run_simulation [--config <path>] [--ticks <n>] [--seed <n>] [--snapshot <path>]\n\n\
         Debug flags:\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut parsed = Args {
        config: None,
        snapshot: None,
        overrides: HashMap::new(),
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                parsed.config = Some(PathBuf::from(v));
            }
            "--snapshot" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                parsed.snapshot = Some(PathBuf::from(v));
            }
            "--ticks" | "--seed" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                parsed.overrides.insert(arg.trim_start_matches("--").to_string(), v);
            }
            "-h" | "--help" => usage_and_exit(),
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }
    parsed
}

fn resolve_config(args: &Args) -> Result<SpikennConfig> {
    match load_config(args.config.as_deref(), Some(&args.overrides)) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) if args.config.is_none() => {
            let mut config = SpikennConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, &args.overrides);
            validate_config(&config)?;
            Ok(config)
        }
        Err(e) => Err(e).context("Failed to load configuration"),
    }
}

fn build_network(config: &SpikennConfig) -> Result<Network> {
    let mut network = Network::from_config(config);
    let input = network.add_layer(false, false);
    let output = network.add_layer(true, false);

    let params = LIFParameters::default();
    let layer = network.layer_mut(input)?;
    layer.add_neurons(INPUT_NEURONS, NeuronType::Excitatory, params);
    layer.set_input_mode(InputMode::AllRandom);

    let layer = network.layer_mut(output)?;
    layer.add_neurons(OUTPUT_EXCITATORY, NeuronType::Excitatory, params);
    layer.add_neurons(OUTPUT_INHIBITORY, NeuronType::Inhibitory, params);
    layer.set_activity_logging(true);

    network.connect_fan_out(input, output, FAN_OUT, &ConnectionParams::default())?;
    network.connect_probabilistic(output, output, 0.2, &ConnectionParams::default())?;
    network.layer_mut(output)?.log_weight(|id| id.0 % 16 == 0);
    Ok(network)
}

fn main() -> Result<()> {
    let args = parse_args();
    let config = resolve_config(&args)?;

    let flags = parse_debug_flags();
    let log_dir = Some(config.logging.log_dir.as_path()).filter(|p| !p.as_os_str().is_empty());
    let _guard = init_logging(&flags, &config.logging.log_level, log_dir)?;

    let mut network = build_network(&config)?;
    let sink = FileLogSink::new(&config.logging.activity_dir).with_context(|| {
        format!(
            "Failed to create activity directory {}",
            config.logging.activity_dir.display()
        )
    })?;
    network.set_log_sink(Box::new(sink));

    info!("Running {} ticks", config.simulation.ticks);
    let summary = network.run(config.simulation.ticks);

    if let Some(path) = &args.snapshot {
        save_network(&network, path, &SnapshotMetadata::describe("run_simulation"))?;
    }

    let layers: Vec<_> = network
        .layers()
        .iter()
        .map(|layer| {
            let weights: Vec<f32> = layer
                .synapses()
                .iter()
                .filter_map(|id| layer.weight_of(*id))
                .collect();
            let mean_weight = if weights.is_empty() {
                0.0
            } else {
                weights.iter().sum::<f32>() / weights.len() as f32
            };
            let spikes: u64 = layer.neurons().iter().map(|n| n.spike_count()).sum();
            json!({
                "layer": layer.id().0,
                "neurons": layer.neuron_count(),
                "synapses": layer.store().len(),
                "spikes": spikes,
                "mean_weight": mean_weight,
            })
        })
        .collect();

    let report = json!({
        "run": summary,
        "seed": network.seed(),
        "activity_dir": config.logging.activity_dir,
        "layers": layers,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use vtype::{Binding, ConfigError, ConvertError, Handle, SequenceConfig};

#[derive(Parser)]
#[command(
    name = "vtype-probe",
    about = "Convert raw values into a typed destination and render it back"
)]
struct Cli {
    /// Destination scalar kind.
    #[arg(long, value_enum, default_value_t = Kind::String, env = "VTYPE_PROBE_KIND")]
    kind: Kind,

    /// Collect values into a list of `kind`.
    #[arg(long)]
    list: bool,

    /// List separator, used for splitting and rendering.
    #[arg(long, default_value = ",")]
    separator: String,

    /// Split every value on the separator.
    #[arg(long)]
    split: bool,

    /// Start the list over on every value instead of appending.
    #[arg(long)]
    replace: bool,

    /// TOML file with list configuration. Overrides the list flags.
    #[arg(long, env = "VTYPE_PROBE_CONFIG")]
    config: Option<PathBuf>,

    /// Raw values, converted in order through one binding.
    values: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Duration,
}

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

fn sequence_config(cli: &Cli) -> Result<SequenceConfig, ProbeError> {
    if let Some(path) = &cli.config {
        let text = std::fs::read_to_string(path).map_err(|source| ProbeError::ReadConfig {
            path: path.clone(),
            source,
        })?;
        return Ok(SequenceConfig::parse(&text)?);
    }

    let mut config = SequenceConfig::default().with_separator(cli.separator.as_str());
    if cli.split {
        config = config.split_each();
    }
    if cli.replace {
        config = config.replace_each_call();
    }
    Ok(config)
}

/// Feed `values` through one binding over an empty `Option<Box<T>>` and print
/// the result.
fn probe<T: Handle>(values: &[String], config: SequenceConfig) -> Result<(), ProbeError> {
    let mut destination: Option<Box<T>> = None;
    let mut binding = Binding::with_config(&mut destination, config);

    tracing::info!(
        type_name = %binding.type_name(),
        bool_like = binding.is_bool_like(),
        values = values.len(),
        "probing destination"
    );

    if values.is_empty() && binding.is_bool_like() {
        binding.convert("true")?;
    }
    for raw in values {
        binding.convert(raw)?;
        tracing::debug!(raw = %raw, "converted");
    }

    let rendered = binding.render()?;
    println!("{}\t{rendered}", binding.type_name());
    Ok(())
}

macro_rules! dispatch {
    ($cli:expr, $config:expr; $($kind:ident => $ty:ty),* $(,)?) => {
        match ($cli.kind, $cli.list) {
            $(
                (Kind::$kind, false) => probe::<$ty>(&$cli.values, $config),
                (Kind::$kind, true) => probe::<Vec<$ty>>(&$cli.values, $config),
            )*
        }
    };
}

fn run(cli: &Cli) -> Result<(), ProbeError> {
    let config = sequence_config(cli)?;
    dispatch!(cli, config;
        String => String,
        Bool => bool,
        I8 => i8,
        I16 => i16,
        I32 => i32,
        I64 => i64,
        Isize => isize,
        U8 => u8,
        U16 => u16,
        U32 => u32,
        U64 => u64,
        Usize => usize,
        F32 => f32,
        F64 => f64,
        Duration => Duration,
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        tracing::error!(error = %e, "probe failed");
        std::process::exit(1);
    }
}

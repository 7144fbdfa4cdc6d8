//! Build script for lumen-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates camera.toml at compile time
//! - Generates configuration constants and stages the autofocus firmware
//!   blob in OUT_DIR

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Instruction memory spans 0x8000..=0xFFFE
const MAX_FIRMWARE_LEN: u64 = 0x7FFF;

/// Validated camera.toml contents
struct CameraConfig {
    i2c_address: u8,
    frequency_hz: u32,
    power_up_delay_ms: u32,
    firmware: Option<String>,
    load_poll_attempts: u16,
    load_poll_interval_ms: u32,
    command_poll_attempts: u16,
    command_poll_interval_ms: u32,
    refocus_interval_s: u32,
}

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    setup_linker(&out_dir);
    let config = validate_config();
    stage_firmware(&out_dir, config.firmware.as_deref());
    generate_constants(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate camera.toml configuration at compile time
fn validate_config() -> CameraConfig {
    // Re-run if camera.toml changes
    println!("cargo:rerun-if-changed=camera.toml");

    let config_path = Path::new("camera.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: camera.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a camera.toml configuration file.         ║\n\
            ║  Please create one in the lumen-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read camera.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in camera.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let camera = section(&config, "camera", &mut errors);
    let autofocus = section(&config, "autofocus", &mut errors);

    let i2c_address = integer(camera, "camera", "i2c_address", 0x3C, 0x08..=0x77, &mut errors);
    let frequency_hz = integer(
        camera,
        "camera",
        "frequency_hz",
        400_000,
        10_000..=1_000_000,
        &mut errors,
    );
    let power_up_delay_ms = integer(camera, "camera", "power_up_delay_ms", 20, 0..=10_000, &mut errors);

    let load_poll_attempts = integer(
        autofocus,
        "autofocus",
        "load_poll_attempts",
        100,
        1..=u16::MAX as i64,
        &mut errors,
    );
    let load_poll_interval_ms = integer(
        autofocus,
        "autofocus",
        "load_poll_interval_ms",
        10,
        0..=1_000,
        &mut errors,
    );
    let command_poll_attempts = integer(
        autofocus,
        "autofocus",
        "command_poll_attempts",
        100,
        1..=u16::MAX as i64,
        &mut errors,
    );
    let command_poll_interval_ms = integer(
        autofocus,
        "autofocus",
        "command_poll_interval_ms",
        10,
        0..=1_000,
        &mut errors,
    );
    let refocus_interval_s = integer(
        autofocus,
        "autofocus",
        "refocus_interval_s",
        5,
        1..=86_400,
        &mut errors,
    );

    let firmware = match autofocus.and_then(|t| t.get("firmware")) {
        Some(toml::Value::String(path)) => Some(path.clone()),
        Some(_) => {
            errors.push("[autofocus] firmware must be a string path".to_string());
            None
        }
        None => None,
    };

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid camera configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=camera.toml validated successfully");

    CameraConfig {
        i2c_address: i2c_address as u8,
        frequency_hz: frequency_hz as u32,
        power_up_delay_ms: power_up_delay_ms as u32,
        firmware,
        load_poll_attempts: load_poll_attempts as u16,
        load_poll_interval_ms: load_poll_interval_ms as u32,
        command_poll_attempts: command_poll_attempts as u16,
        command_poll_interval_ms: command_poll_interval_ms as u32,
        refocus_interval_s: refocus_interval_s as u32,
    }
}

/// Look up a required top-level table
fn section<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => {
            errors.push(format!("Missing [{}] section", name));
            None
        }
    }
}

/// Read an optional integer field, checking its range
fn integer(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    match table.and_then(|t| t.get(key)) {
        Some(toml::Value::Integer(v)) if range.contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            default
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
        None => default,
    }
}

/// Copy the autofocus firmware blob to OUT_DIR/af_firmware.bin
///
/// A missing blob is staged as an empty file so the board still builds;
/// the autofocus task reports it at runtime.
fn stage_firmware(out_dir: &Path, firmware: Option<&str>) {
    let staged = out_dir.join("af_firmware.bin");

    let Some(path) = firmware else {
        println!("cargo:warning=no [autofocus] firmware configured, autofocus disabled");
        fs::write(&staged, b"").unwrap();
        return;
    };

    println!("cargo:rerun-if-changed={}", path);
    let source = Path::new(path);

    match fs::metadata(source) {
        Ok(meta) if meta.len() > MAX_FIRMWARE_LEN => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Autofocus firmware too large                             ║\n\
                ║                                                                  ║\n\
                ║  {:<64} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format!("{} bytes, limit is {}", meta.len(), MAX_FIRMWARE_LEN)
            );
        }
        Ok(_) => {
            fs::copy(source, &staged).unwrap();
        }
        Err(_) => {
            println!(
                "cargo:warning=autofocus firmware '{}' not found, autofocus disabled",
                path
            );
            fs::write(&staged, b"").unwrap();
        }
    }
}

/// Write OUT_DIR/camera_config.rs
fn generate_constants(out_dir: &Path, config: &CameraConfig) {
    let generated = format!(
        "// Generated by build.rs from camera.toml\n\
         pub const I2C_ADDRESS: u8 = {:#04x};\n\
         pub const I2C_FREQUENCY_HZ: u32 = {};\n\
         pub const POWER_UP_DELAY_MS: u64 = {};\n\
         pub const LOAD_POLL: PollPolicy = PollPolicy::new({}, {});\n\
         pub const COMMAND_POLL: PollPolicy = PollPolicy::new({}, {});\n\
         pub const REFOCUS_INTERVAL_S: u64 = {};\n\
         pub static AF_FIRMWARE: &[u8] = include_bytes!(concat!(env!(\"OUT_DIR\"), \"/af_firmware.bin\"));\n",
        config.i2c_address,
        config.frequency_hz,
        config.power_up_delay_ms,
        config.load_poll_attempts,
        config.load_poll_interval_ms,
        config.command_poll_attempts,
        config.command_poll_interval_ms,
        config.refocus_interval_s,
    );

    fs::write(out_dir.join("camera_config.rs"), generated).unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

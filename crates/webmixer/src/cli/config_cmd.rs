//! `config` subcommand — show the effective configuration and where it came from,
//! optionally writing it back as a starter file.

use super::{
    Config, ConfigOutput, GlobalOptions, Result, effective_config, kv, kv_indent, kv_width,
    print_json,
};

pub(super) fn cmd_config(options: &GlobalOptions, write: bool) -> Result<()> {
    let config = effective_config(options);
    let config_path = options.config_path.clone().or_else(Config::path);
    if write {
        match &options.config_path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        log::info!("config written");
    }
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());
    let problems: Vec<String> = match config.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    };

    if options.json {
        return print_json(&ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            written: write,
            settings: config,
            problems,
        });
    }

    let w = kv_width(
        &["Config file:", "Listen:"],
        &[
            "card_index:",
            "amixer_path:",
            "bind_address:",
            "port:",
            "cors_allowed_origins:",
            "strict_updates:",
        ],
    );

    match &config_path {
        Some(p) if write => kv("Config file:", format_args!("{} (written)", p.display()), w),
        Some(p) if config_exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    match config.socket_addr() {
        Ok(addr) => kv("Listen:", format_args!("http://{addr}"), w),
        Err(_) => kv("Listen:", "(invalid bind address)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("card_index:", format_args!("{} (hw:{0})", config.card_index), w);
    kv_indent("amixer_path:", &config.amixer_path, w);
    kv_indent("bind_address:", &config.bind_address, w);
    kv_indent("port:", config.port, w);
    let origins = if config.cors_allowed_origins.is_empty() {
        "(any)".to_string()
    } else {
        config.cors_allowed_origins.join(", ")
    };
    kv_indent("cors_allowed_origins:", origins, w);
    kv_indent("strict_updates:", config.strict_updates, w);

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }

    Ok(())
}

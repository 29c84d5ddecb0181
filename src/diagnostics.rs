use crate::config::{Config, ConfirmMode};

pub fn check(cfg: &Config) -> anyhow::Result<()> {
    let mut errors: Vec<String> = Vec::new();

    // Check 1: pinentry binary found
    if cfg.confirm == ConfirmMode::Pinentry {
        if let Err(e) = std::process::Command::new(&cfg.pinentry)
            .arg("--version")
            .output()
        {
            errors.push(format!(
                "pinentry binary not found: '{}': {e}\n  \
                 → install pinentry or use --confirm console",
                cfg.pinentry
            ));
        }
    }

    // Check 2: at least one hidraw node is accessible
    check_hidraw(&mut errors);

    if errors.is_empty() {
        return Ok(());
    }

    for err in &errors {
        eprintln!("ERROR: {err}");
    }
    anyhow::bail!("{} preflight check(s) failed", errors.len());
}

#[cfg(target_os = "linux")]
fn check_hidraw(errors: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir("/dev") else {
        return;
    };
    let nodes: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.file_name().is_some_and(|n| n.to_string_lossy().starts_with("hidraw")))
        .collect();
    let accessible = nodes
        .iter()
        .any(|p| std::fs::OpenOptions::new().read(true).write(true).open(p).is_ok());
    if !nodes.is_empty() && !accessible {
        errors.push(
            "no /dev/hidraw* node is readable and writable\n  \
             → install the device udev rule and replug the token"
                .to_string(),
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn check_hidraw(_errors: &mut Vec<String>) {}

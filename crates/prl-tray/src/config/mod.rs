#[allow(clippy::module_inception)]
mod config;
mod hypervisor_config;

pub(crate) use {config::Config, hypervisor_config::HypervisorConfig};

pub(crate) const PREFERENCES_FILE_NAME: &str = "settings.toml";

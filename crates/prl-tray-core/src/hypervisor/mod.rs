mod client;
mod vm_record;
mod vm_status;

pub use {
    client::{DEFAULT_PRLCTL_PATH, Hypervisor, PRLCTL_PATH_ENV, PrlctlClient, parse_vm_list},
    vm_record::VmRecord,
    vm_status::{STATUS_RUNNING, STATUS_STOPPED, VmStatus},
};

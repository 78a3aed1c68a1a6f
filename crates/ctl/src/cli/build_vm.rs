use std::collections::HashMap;

use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;
use xenapi::{
    provision,
    records::{VbdCreate, VifCreate, VmRecord, VmRef},
    XenClient,
};

use crate::{
    cli::{resolve_network, resolve_sr},
    size::gib_to_bytes,
};

#[derive(Parser)]
#[command(about = "Clone a template into a new VM, attach media and network, and start it")]
pub struct BuildVmCommand {
    #[arg(short, long, help = "Name label prefix of the template to clone")]
    template: String,
    #[arg(short, long, help = "Name of the new VM")]
    name: String,
    #[arg(long, default_value_t = 1, help = "Number of virtual CPUs")]
    cpus: u32,
    #[arg(long, default_value_t = 1, help = "Amount of memory in GiB")]
    ram: u64,
    #[arg(
        short,
        long,
        help = "Name of the SR to provision disks on, pool default when unset"
    )]
    sr: Option<String>,
    #[arg(
        long,
        default_value = "ISO_IMAGES_LOCAL",
        help = "Name of the SR holding installer media"
    )]
    iso_sr: String,
    #[arg(
        short = 'd',
        long,
        help = "Device name of the PIF to attach the VIF through, e.g. bond0"
    )]
    network_device: String,
}

impl BuildVmCommand {
    pub async fn run(self, client: &XenClient) -> Result<()> {
        info!("checking for templates matching: {}", self.template);
        let vms = client.vm().get_all_records().await?;
        info!("pool has {} VM objects (this includes templates)", vms.len());

        let candidates = matching_templates(vms, &self.template);
        for (template, record) in &candidates {
            info!("found: {} ({})", record.name_label, template);
        }
        let (template, record) = candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no template found matching '{}'", self.template))?;
        info!("selected template: {}", record.name_label);

        info!("installing new VM from the template");
        let vm = client.vm().clone(&template, &self.name).await?;
        client.vm().set_pv_args(&vm, "non-interactive").await?;

        let (_, sr_record) = resolve_sr(client, self.sr.as_deref()).await?;
        info!(
            "choosing SR to instantiate the VM disks: {} (uuid {})",
            sr_record.name_label, sr_record.uuid
        );

        info!("rewriting the disk provisioning spec");
        let mut spec = provision::get_provision_spec(client, &vm).await?;
        spec.set_sr(&sr_record.uuid);
        provision::set_provision_spec(client, &vm, &spec).await?;
        client.vm().provision(&vm).await?;

        self.attach_installer_media(client, &vm).await?;

        let network = resolve_network(client, &self.network_device).await?;
        client
            .vif()
            .create(&VifCreate::pool_assigned_mac(network, vm.clone(), 0))
            .await?;

        let bytes = gib_to_bytes(self.ram)?;
        client
            .vm()
            .set_memory_limits(&vm, bytes, bytes, bytes, bytes)
            .await?;
        client.vm().set_vcpus_max(&vm, self.cpus).await?;
        client.vm().set_vcpus_at_startup(&vm, self.cpus).await?;

        client.vm().start(&vm, false, true).await?;
        info!("VM {} started", self.name);
        println!("{}", vm);
        Ok(())
    }

    /// Attach the first VDI of the ISO SR as a bootable CD drive.
    async fn attach_installer_media(&self, client: &XenClient, vm: &VmRef) -> Result<()> {
        let sr = client
            .sr()
            .get_by_name_label(&self.iso_sr)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("unable to resolve ISO SR '{}'", self.iso_sr))?;
        let record = client.sr().get_record(&sr).await?;
        let vdi = record
            .vdis
            .first()
            .ok_or_else(|| anyhow!("ISO SR '{}' holds no VDIs", self.iso_sr))?;
        let vbd = client
            .vbd()
            .create(&VbdCreate::installer_media(vdi.clone(), vm.clone()))
            .await?;
        client.vbd().set_bootable(&vbd, true).await?;
        Ok(())
    }
}

/// Filter the full VM table down to templates whose name label starts with
/// the requested prefix, ordered by name label so the selection is stable.
fn matching_templates(vms: HashMap<VmRef, VmRecord>, prefix: &str) -> Vec<(VmRef, VmRecord)> {
    let mut matches: Vec<(VmRef, VmRecord)> = vms
        .into_iter()
        .filter(|(_, record)| record.is_a_template && record.name_label.starts_with(prefix))
        .collect();
    matches.sort_by(|a, b| a.1.name_label.cmp(&b.1.name_label));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm(name: &str, is_a_template: bool) -> VmRecord {
        VmRecord {
            uuid: format!("uuid-{}", name),
            name_label: name.to_string(),
            name_description: String::new(),
            is_a_template,
            power_state: "Halted".to_string(),
            other_config: HashMap::new(),
        }
    }

    fn table(records: Vec<VmRecord>) -> HashMap<VmRef, VmRecord> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| (VmRef(format!("OpaqueRef:{}", i)), record))
            .collect()
    }

    #[test]
    fn prefix_match_selects_templates_only() {
        let vms = table(vec![
            vm("CentOS 7 Minimal", true),
            vm("CentOS 7 existing-vm", false),
            vm("Debian 12", true),
        ]);
        let matches = matching_templates(vms, "CentOS 7");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].1.name_label, "CentOS 7 Minimal");
    }

    #[test]
    fn matches_are_ordered_by_name_label() {
        let vms = table(vec![
            vm("CentOS 7.9", true),
            vm("CentOS 7.2", true),
            vm("CentOS 7.5", true),
        ]);
        let matches = matching_templates(vms, "CentOS");
        let names: Vec<&str> = matches
            .iter()
            .map(|(_, record)| record.name_label.as_str())
            .collect();
        assert_eq!(names, vec!["CentOS 7.2", "CentOS 7.5", "CentOS 7.9"]);
    }

    #[test]
    fn no_match_yields_empty_set() {
        let vms = table(vec![vm("Debian 12", true)]);
        assert!(matching_templates(vms, "CentOS").is_empty());
    }
}

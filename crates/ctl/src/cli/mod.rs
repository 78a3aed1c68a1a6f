pub mod build_vm;
pub mod create_disk;
pub mod create_network;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use log::{error, info, warn};
use xenapi::{
    records::{NetworkRef, PifRecord, PifRef, SrRecord, SrRef, VmRef},
    XenClient,
};

use crate::{
    cli::{
        build_vm::BuildVmCommand, create_disk::CreateDiskCommand,
        create_network::CreateNetworkCommand,
    },
    config::{BuilderConfig, PoolConnection},
};

#[derive(Parser)]
#[command(version, about = "Build and wire up virtual machines on a XenAPI pool")]
pub struct BuilderCommand {
    #[arg(
        short = 'c',
        long,
        default_value = "xenbuilder.toml",
        help = "Path to the pool configuration file"
    )]
    config: PathBuf,

    #[arg(long, help = "URL of the pool manager to connect to")]
    pool: Option<String>,

    #[arg(long, help = "User to authenticate to the pool as")]
    pool_user: Option<String>,

    #[arg(
        long,
        help = "Password for the pool user, prefer XENBUILDER_PASSWORD or the config file"
    )]
    pool_password: Option<String>,

    #[command(subcommand)]
    command: BuilderCommands,
}

#[derive(Parser)]
pub enum BuilderCommands {
    BuildVm(BuildVmCommand),
    CreateDisk(CreateDiskCommand),
    CreateNetwork(CreateNetworkCommand),
}

impl BuilderCommand {
    pub async fn run(self) -> Result<()> {
        let config = BuilderConfig::load(&self.config).await?;
        let password = self
            .pool_password
            .or_else(|| std::env::var("XENBUILDER_PASSWORD").ok());
        let pool = PoolConnection::resolve(config, self.pool, self.pool_user, password)?;

        info!("establishing connection to pool {}", pool.url);
        let client = XenClient::connect(pool.url, &pool.username, &pool.password).await?;
        info!("connection successful");

        let result = self.command.run(&client).await;
        if let Err(ref err) = result {
            error!("command failed: {:#}", err);
        }
        if let Err(err) = client.logout().await {
            warn!("failed to end the pool session: {}", err);
        }
        result
    }
}

impl BuilderCommands {
    pub async fn run(self, client: &XenClient) -> Result<()> {
        match self {
            BuilderCommands::BuildVm(build_vm) => build_vm.run(client).await,

            BuilderCommands::CreateDisk(create_disk) => create_disk.run(client).await,

            BuilderCommands::CreateNetwork(create_network) => create_network.run(client).await,
        }
    }
}

/// Resolve a VM ref by name label. xapi hands back every match; the first
/// one wins, like the original tooling this replaces.
pub async fn resolve_vm(client: &XenClient, name: &str) -> Result<VmRef> {
    client
        .vm()
        .get_by_name_label(name)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("unable to resolve VM '{}'", name))
}

/// Resolve the SR to place disks on: a name label when given, the pool
/// default SR otherwise.
pub async fn resolve_sr(client: &XenClient, label: Option<&str>) -> Result<(SrRef, SrRecord)> {
    let sr = match label {
        Some(label) => client
            .sr()
            .get_by_name_label(label)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("unable to resolve SR '{}'", label))?,
        None => {
            let pools = client.pool().get_all().await?;
            let pool = pools
                .first()
                .ok_or_else(|| anyhow!("pool manager returned no pool record"))?;
            client.pool().get_default_sr(pool).await?
        }
    };
    let record = client.sr().get_record(&sr).await?;
    Ok((sr, record))
}

/// Resolve the network behind the PIF whose device name matches, e.g.
/// `bond0` or `eth1`.
pub async fn resolve_network(client: &XenClient, device: &str) -> Result<NetworkRef> {
    let pifs = client.pif().get_all_records().await?;
    let pif = find_pif_by_device(&pifs, device)
        .ok_or_else(|| anyhow!("unable to find a PIF with device '{}'", device))?;
    info!("chose PIF with device: {}", device);
    let network = client.pif().get_network(&pif).await?;
    let network_name = client.network().get_name_label(&network).await?;
    info!("chosen PIF is connected to network: {}", network_name);
    Ok(network)
}

/// Pick the PIF carrying the named device. Bonds and VLANs repeat device
/// names across pool hosts, so ties break on uuid to stay deterministic.
fn find_pif_by_device(pifs: &HashMap<PifRef, PifRecord>, device: &str) -> Option<PifRef> {
    pifs.iter()
        .filter(|(_, record)| record.device == device)
        .min_by(|a, b| a.1.uuid.cmp(&b.1.uuid))
        .map(|(pif, _)| pif.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pif(uuid: &str, device: &str) -> PifRecord {
        PifRecord {
            uuid: uuid.to_string(),
            device: device.to_string(),
            management: false,
        }
    }

    #[test]
    fn finds_pif_by_device_name() {
        let mut pifs = HashMap::new();
        pifs.insert(PifRef("OpaqueRef:a".to_string()), pif("1111", "eth0"));
        pifs.insert(PifRef("OpaqueRef:b".to_string()), pif("2222", "bond0"));
        assert_eq!(
            find_pif_by_device(&pifs, "bond0"),
            Some(PifRef("OpaqueRef:b".to_string()))
        );
    }

    #[test]
    fn unknown_device_finds_nothing() {
        let mut pifs = HashMap::new();
        pifs.insert(PifRef("OpaqueRef:a".to_string()), pif("1111", "eth0"));
        assert_eq!(find_pif_by_device(&pifs, "bond0"), None);
    }

    #[test]
    fn duplicate_devices_tie_break_on_uuid() {
        let mut pifs = HashMap::new();
        pifs.insert(PifRef("OpaqueRef:a".to_string()), pif("9999", "bond0"));
        pifs.insert(PifRef("OpaqueRef:b".to_string()), pif("1111", "bond0"));
        assert_eq!(
            find_pif_by_device(&pifs, "bond0"),
            Some(PifRef("OpaqueRef:b".to_string()))
        );
    }
}

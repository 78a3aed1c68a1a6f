use anyhow::Result;
use clap::Parser;
use log::info;
use xenapi::{records::VifCreate, XenClient};

use crate::cli::{resolve_network, resolve_vm};

#[derive(Parser)]
#[command(about = "Create a VIF on a PIF-backed network and attach it to a VM")]
pub struct CreateNetworkCommand {
    #[arg(long, help = "Name of the VM to attach the VIF to")]
    vm: String,
    #[arg(
        long,
        default_value_t = 0,
        help = "VIF device number on the VM, the first VIF is 0 and each further one increments"
    )]
    device_no: u32,
    #[arg(
        short = 'd',
        long,
        help = "Device name of the PIF to attach through, e.g. bond0"
    )]
    network_device: String,
}

impl CreateNetworkCommand {
    pub async fn run(self, client: &XenClient) -> Result<()> {
        let vm = resolve_vm(client, &self.vm).await?;
        let network = resolve_network(client, &self.network_device).await?;

        let vif = client
            .vif()
            .create(&VifCreate::pool_assigned_mac(network, vm, self.device_no))
            .await?;

        info!("VIF created for {}", self.vm);
        println!("{}", vif);
        Ok(())
    }
}

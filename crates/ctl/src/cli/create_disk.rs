use anyhow::Result;
use clap::Parser;
use log::info;
use xenapi::{
    records::{VbdCreate, VdiCreate},
    XenClient,
};

use crate::{
    cli::{resolve_sr, resolve_vm},
    size::gib_to_bytes,
};

#[derive(Parser)]
#[command(about = "Create a VDI and attach it to a VM as an additional disk")]
pub struct CreateDiskCommand {
    #[arg(short, long, help = "Name of the new disk")]
    name: String,
    #[arg(long, help = "Name of the VM to attach the disk to")]
    vm: String,
    #[arg(short, long, default_value_t = 10, help = "Size of the disk in GiB")]
    size: u64,
    #[arg(
        long,
        help = "Name of the SR to create the disk on, pool default when unset"
    )]
    sr: Option<String>,
    #[arg(long, help = "Attach the disk read-only")]
    read_only: bool,
    #[arg(long, help = "Guest device name, e.g. /dev/xvdb")]
    device_name: String,
    #[arg(long, help = "Userdevice slot on the VM, must be unique")]
    user_device_no: String,
}

impl CreateDiskCommand {
    pub async fn run(self, client: &XenClient) -> Result<()> {
        let (sr, sr_record) = resolve_sr(client, self.sr.as_deref()).await?;
        info!(
            "creating disk on SR: {} (uuid {})",
            sr_record.name_label, sr_record.uuid
        );
        let vm = resolve_vm(client, &self.vm).await?;

        let bytes = gib_to_bytes(self.size)?;
        let vdi = client
            .vdi()
            .create(&VdiCreate::user_disk(&self.name, sr, bytes, self.read_only))
            .await?;

        client
            .vbd()
            .create(&VbdCreate::disk(
                vdi.clone(),
                vm,
                &self.user_device_no,
                &self.device_name,
                self.read_only,
            ))
            .await?;

        info!("disk {} created and attached to {}", self.name, self.vm);
        println!("{}", vdi);
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    records::VmRef,
    XenClient,
};

/// The disk provisioning document a template carries in its
/// `other_config["disks"]` key. `VM.provision` instantiates one VDI per
/// `<disk>` element on the SR named by the `sr` attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "provision")]
pub struct ProvisionSpec {
    #[serde(rename = "disk", default)]
    pub disks: Vec<ProvisionDisk>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionDisk {
    #[serde(rename = "@device")]
    pub device: String,
    #[serde(rename = "@size")]
    pub size: String,
    #[serde(rename = "@sr")]
    pub sr: String,
    #[serde(rename = "@bootable")]
    pub bootable: String,
    #[serde(rename = "@type")]
    pub disk_type: String,
}

impl ProvisionSpec {
    pub fn parse(xml: &str) -> Result<ProvisionSpec> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    pub fn to_xml(&self) -> Result<String> {
        Ok(quick_xml::se::to_string(self)?)
    }

    /// Point every disk in the spec at the SR with the given uuid.
    pub fn set_sr(&mut self, uuid: &str) {
        for disk in &mut self.disks {
            disk.sr = uuid.to_string();
        }
    }
}

pub async fn get_provision_spec(client: &XenClient, vm: &VmRef) -> Result<ProvisionSpec> {
    let other_config = client.vm().get_other_config(vm).await?;
    let xml = other_config
        .get("disks")
        .ok_or(Error::ProvisionSpecMissing)?;
    ProvisionSpec::parse(xml)
}

pub async fn set_provision_spec(
    client: &XenClient,
    vm: &VmRef,
    spec: &ProvisionSpec,
) -> Result<()> {
    let xml = spec.to_xml()?;
    // remove_from_other_config faults when the key is absent, which it never
    // is for a freshly cloned template, but a missing key is fine to ignore.
    if let Err(error) = client.vm().remove_from_other_config(vm, "disks").await {
        log::debug!("removing previous provision spec: {}", error);
    }
    client.vm().add_to_other_config(vm, "disks", &xml).await
}

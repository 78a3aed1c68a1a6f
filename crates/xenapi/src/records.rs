use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_ref {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_ref!(SessionRef);
opaque_ref!(VmRef);
opaque_ref!(SrRef);
opaque_ref!(VdiRef);
opaque_ref!(VbdRef);
opaque_ref!(VifRef);
opaque_ref!(PifRef);
opaque_ref!(NetworkRef);
opaque_ref!(PoolRef);

/// Partial VM record. xapi returns far more fields than listed here and
/// serde drops the rest.
#[derive(Clone, Debug, Deserialize)]
pub struct VmRecord {
    pub uuid: String,
    pub name_label: String,
    #[serde(default)]
    pub name_description: String,
    pub is_a_template: bool,
    #[serde(default)]
    pub power_state: String,
    #[serde(default)]
    pub other_config: HashMap<String, String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SrRecord {
    pub uuid: String,
    pub name_label: String,
    #[serde(default)]
    pub name_description: String,
    #[serde(rename = "VDIs", default)]
    pub vdis: Vec<VdiRef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PifRecord {
    pub uuid: String,
    pub device: String,
    #[serde(default)]
    pub management: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub enum VbdMode {
    #[serde(rename = "RO")]
    ReadOnly,
    #[serde(rename = "RW")]
    ReadWrite,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub enum VbdType {
    #[serde(rename = "CD")]
    Cd,
    #[serde(rename = "Disk")]
    Disk,
}

/// Arguments to `VBD.create`, with xapi's record field casing.
#[derive(Clone, Debug, Serialize)]
pub struct VbdCreate {
    #[serde(rename = "VDI")]
    pub vdi: VdiRef,
    #[serde(rename = "VM")]
    pub vm: VmRef,
    pub userdevice: String,
    pub device: String,
    pub mode: VbdMode,
    #[serde(rename = "type")]
    pub kind: VbdType,
    pub bootable: bool,
    pub unpluggable: bool,
    pub empty: bool,
    pub other_config: HashMap<String, String>,
    pub qos_algorithm_type: String,
    pub qos_algorithm_params: HashMap<String, String>,
}

impl VbdCreate {
    /// A bootable installer media drive, always attached as userdevice 1.
    pub fn installer_media(vdi: VdiRef, vm: VmRef) -> VbdCreate {
        VbdCreate {
            vdi,
            vm,
            userdevice: "1".to_string(),
            device: String::new(),
            mode: VbdMode::ReadOnly,
            kind: VbdType::Cd,
            bootable: true,
            unpluggable: true,
            empty: false,
            other_config: HashMap::new(),
            qos_algorithm_type: String::new(),
            qos_algorithm_params: HashMap::new(),
        }
    }

    /// A data disk attachment for an existing VDI.
    pub fn disk(
        vdi: VdiRef,
        vm: VmRef,
        userdevice: impl AsRef<str>,
        device: impl AsRef<str>,
        read_only: bool,
    ) -> VbdCreate {
        VbdCreate {
            vdi,
            vm,
            userdevice: userdevice.as_ref().to_string(),
            device: device.as_ref().to_string(),
            mode: if read_only {
                VbdMode::ReadOnly
            } else {
                VbdMode::ReadWrite
            },
            kind: VbdType::Disk,
            bootable: false,
            unpluggable: true,
            empty: false,
            other_config: HashMap::new(),
            qos_algorithm_type: String::new(),
            qos_algorithm_params: HashMap::new(),
        }
    }
}

/// Arguments to `VIF.create`. An empty MAC asks the pool to assign one.
#[derive(Clone, Debug, Serialize)]
pub struct VifCreate {
    pub device: String,
    pub network: NetworkRef,
    #[serde(rename = "VM")]
    pub vm: VmRef,
    #[serde(rename = "MAC")]
    pub mac: String,
    #[serde(rename = "MTU")]
    pub mtu: String,
    pub other_config: HashMap<String, String>,
    pub qos_algorithm_type: String,
    pub qos_algorithm_params: HashMap<String, String>,
}

impl VifCreate {
    pub fn pool_assigned_mac(network: NetworkRef, vm: VmRef, device: u32) -> VifCreate {
        VifCreate {
            device: device.to_string(),
            network,
            vm,
            mac: String::new(),
            mtu: "1500".to_string(),
            other_config: HashMap::new(),
            qos_algorithm_type: String::new(),
            qos_algorithm_params: HashMap::new(),
        }
    }
}

/// Arguments to `VDI.create`. `virtual_size` is a decimal byte count, as
/// xapi expects int64 values on the wire.
#[derive(Clone, Debug, Serialize)]
pub struct VdiCreate {
    pub name_label: String,
    pub name_description: String,
    #[serde(rename = "SR")]
    pub sr: SrRef,
    pub virtual_size: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sharable: bool,
    pub read_only: bool,
    pub other_config: HashMap<String, String>,
}

impl VdiCreate {
    pub fn user_disk(name: impl AsRef<str>, sr: SrRef, size_bytes: u64, read_only: bool) -> VdiCreate {
        VdiCreate {
            name_label: name.as_ref().to_string(),
            name_description: name.as_ref().to_string(),
            sr,
            virtual_size: size_bytes.to_string(),
            kind: "user".to_string(),
            sharable: false,
            read_only,
            other_config: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vm_record_decodes_with_xapi_casing() {
        let record: VmRecord = serde_json::from_value(json!({
            "uuid": "6d2c1d0c-41ec-4c8e-8d51-f0cd78b2f935",
            "name_label": "CentOS 7 Minimal",
            "is_a_template": true,
            "power_state": "Halted",
            "memory_static_max": "4294967296",
            "other_config": {"disks": "<provision/>"},
        }))
        .unwrap();
        assert!(record.is_a_template);
        assert_eq!(record.name_label, "CentOS 7 Minimal");
        assert_eq!(record.other_config.get("disks").unwrap(), "<provision/>");
    }

    #[test]
    fn sr_record_collects_vdi_refs() {
        let record: SrRecord = serde_json::from_value(json!({
            "uuid": "a5dfd8df-f92b-4d98-8de4-9b9d318b7c9b",
            "name_label": "ISO_IMAGES_LOCAL",
            "VDIs": ["OpaqueRef:vdi-1", "OpaqueRef:vdi-2"],
        }))
        .unwrap();
        assert_eq!(record.vdis.len(), 2);
        assert_eq!(record.vdis[0], VdiRef("OpaqueRef:vdi-1".to_string()));
    }

    #[test]
    fn vbd_create_uses_xapi_field_names() {
        let create = VbdCreate::installer_media(
            VdiRef("OpaqueRef:vdi".to_string()),
            VmRef("OpaqueRef:vm".to_string()),
        );
        let encoded = serde_json::to_value(&create).unwrap();
        assert_eq!(encoded["VDI"], "OpaqueRef:vdi");
        assert_eq!(encoded["VM"], "OpaqueRef:vm");
        assert_eq!(encoded["mode"], "RO");
        assert_eq!(encoded["type"], "CD");
        assert_eq!(encoded["userdevice"], "1");
        assert_eq!(encoded["bootable"], true);
        assert_eq!(encoded["qos_algorithm_type"], "");
    }

    #[test]
    fn disk_vbd_honors_read_only() {
        let create = VbdCreate::disk(
            VdiRef("OpaqueRef:vdi".to_string()),
            VmRef("OpaqueRef:vm".to_string()),
            "2",
            "/dev/xvdb",
            false,
        );
        assert_eq!(create.mode, VbdMode::ReadWrite);
        assert_eq!(create.kind, VbdType::Disk);
        assert!(!create.bootable);
    }

    #[test]
    fn vif_create_requests_pool_assigned_mac() {
        let create = VifCreate::pool_assigned_mac(
            NetworkRef("OpaqueRef:net".to_string()),
            VmRef("OpaqueRef:vm".to_string()),
            0,
        );
        let encoded = serde_json::to_value(&create).unwrap();
        assert_eq!(encoded["device"], "0");
        assert_eq!(encoded["MAC"], "");
        assert_eq!(encoded["MTU"], "1500");
    }

    #[test]
    fn vdi_create_carries_byte_size_as_string() {
        let create = VdiCreate::user_disk(
            "scratch",
            SrRef("OpaqueRef:sr".to_string()),
            10 * 1024 * 1024 * 1024,
            false,
        );
        let encoded = serde_json::to_value(&create).unwrap();
        assert_eq!(encoded["virtual_size"], "10737418240");
        assert_eq!(encoded["type"], "user");
        assert_eq!(encoded["SR"], "OpaqueRef:sr");
        assert_eq!(encoded["sharable"], false);
    }
}

use std::collections::HashMap;

use serde_json::to_value;

use crate::{
    error::Result,
    records::{VmRecord, VmRef},
    XenClient,
};

/// Remote operations on the VM class.
pub struct VmApi<'a> {
    client: &'a XenClient,
}

impl<'a> VmApi<'a> {
    pub(crate) fn new(client: &'a XenClient) -> VmApi<'a> {
        VmApi { client }
    }

    pub async fn get_all_records(&self) -> Result<HashMap<VmRef, VmRecord>> {
        self.client.call("VM.get_all_records", vec![]).await
    }

    pub async fn get_record(&self, vm: &VmRef) -> Result<VmRecord> {
        self.client.call("VM.get_record", vec![to_value(vm)?]).await
    }

    pub async fn get_by_name_label(&self, label: &str) -> Result<Vec<VmRef>> {
        self.client
            .call("VM.get_by_name_label", vec![to_value(label)?])
            .await
    }

    pub async fn get_by_uuid(&self, uuid: &str) -> Result<VmRef> {
        self.client
            .call("VM.get_by_uuid", vec![to_value(uuid)?])
            .await
    }

    pub async fn get_uuid(&self, vm: &VmRef) -> Result<String> {
        self.client.call("VM.get_uuid", vec![to_value(vm)?]).await
    }

    pub async fn get_name_label(&self, vm: &VmRef) -> Result<String> {
        self.client
            .call("VM.get_name_label", vec![to_value(vm)?])
            .await
    }

    /// Clone a halted VM or template into a new halted VM.
    pub async fn clone(&self, vm: &VmRef, name: &str) -> Result<VmRef> {
        self.client
            .call("VM.clone", vec![to_value(vm)?, to_value(name)?])
            .await
    }

    /// Instantiate the disks described by the provisioning spec of a VM
    /// cloned from a template.
    pub async fn provision(&self, vm: &VmRef) -> Result<()> {
        self.client
            .call_void("VM.provision", vec![to_value(vm)?])
            .await
    }

    pub async fn set_pv_args(&self, vm: &VmRef, args: &str) -> Result<()> {
        self.client
            .call_void("VM.set_PV_args", vec![to_value(vm)?, to_value(args)?])
            .await
    }

    /// Set all four memory limits at once. Values are byte counts, passed as
    /// decimal strings since xapi wants int64 fields stringified.
    pub async fn set_memory_limits(
        &self,
        vm: &VmRef,
        static_min: u64,
        static_max: u64,
        dynamic_min: u64,
        dynamic_max: u64,
    ) -> Result<()> {
        self.client
            .call_void(
                "VM.set_memory_limits",
                vec![
                    to_value(vm)?,
                    to_value(static_min.to_string())?,
                    to_value(static_max.to_string())?,
                    to_value(dynamic_min.to_string())?,
                    to_value(dynamic_max.to_string())?,
                ],
            )
            .await
    }

    pub async fn set_vcpus_max(&self, vm: &VmRef, cpus: u32) -> Result<()> {
        self.client
            .call_void("VM.set_VCPUs_max", vec![to_value(vm)?, to_value(cpus)?])
            .await
    }

    pub async fn set_vcpus_at_startup(&self, vm: &VmRef, cpus: u32) -> Result<()> {
        self.client
            .call_void(
                "VM.set_VCPUs_at_startup",
                vec![to_value(vm)?, to_value(cpus)?],
            )
            .await
    }

    pub async fn start(&self, vm: &VmRef, start_paused: bool, force: bool) -> Result<()> {
        self.client
            .call_void(
                "VM.start",
                vec![to_value(vm)?, to_value(start_paused)?, to_value(force)?],
            )
            .await
    }

    pub async fn get_other_config(&self, vm: &VmRef) -> Result<HashMap<String, String>> {
        self.client
            .call("VM.get_other_config", vec![to_value(vm)?])
            .await
    }

    pub async fn remove_from_other_config(&self, vm: &VmRef, key: &str) -> Result<()> {
        self.client
            .call_void(
                "VM.remove_from_other_config",
                vec![to_value(vm)?, to_value(key)?],
            )
            .await
    }

    pub async fn add_to_other_config(&self, vm: &VmRef, key: &str, value: &str) -> Result<()> {
        self.client
            .call_void(
                "VM.add_to_other_config",
                vec![to_value(vm)?, to_value(key)?, to_value(value)?],
            )
            .await
    }
}

use serde_json::to_value;

use crate::{
    error::Result,
    records::{VbdCreate, VbdRef},
    XenClient,
};

/// Remote operations on the VBD class.
pub struct VbdApi<'a> {
    client: &'a XenClient,
}

impl<'a> VbdApi<'a> {
    pub(crate) fn new(client: &'a XenClient) -> VbdApi<'a> {
        VbdApi { client }
    }

    pub async fn create(&self, record: &VbdCreate) -> Result<VbdRef> {
        self.client.call("VBD.create", vec![to_value(record)?]).await
    }

    pub async fn set_bootable(&self, vbd: &VbdRef, bootable: bool) -> Result<()> {
        self.client
            .call_void(
                "VBD.set_bootable",
                vec![to_value(vbd)?, to_value(bootable)?],
            )
            .await
    }
}

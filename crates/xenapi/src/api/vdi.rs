use serde_json::to_value;

use crate::{
    error::Result,
    records::{VdiCreate, VdiRef},
    XenClient,
};

/// Remote operations on the VDI class.
pub struct VdiApi<'a> {
    client: &'a XenClient,
}

impl<'a> VdiApi<'a> {
    pub(crate) fn new(client: &'a XenClient) -> VdiApi<'a> {
        VdiApi { client }
    }

    pub async fn create(&self, record: &VdiCreate) -> Result<VdiRef> {
        self.client.call("VDI.create", vec![to_value(record)?]).await
    }
}

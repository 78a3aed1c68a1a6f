use serde_json::to_value;

use crate::{
    error::Result,
    records::{VifCreate, VifRef},
    XenClient,
};

/// Remote operations on the VIF class.
pub struct VifApi<'a> {
    client: &'a XenClient,
}

impl<'a> VifApi<'a> {
    pub(crate) fn new(client: &'a XenClient) -> VifApi<'a> {
        VifApi { client }
    }

    pub async fn create(&self, record: &VifCreate) -> Result<VifRef> {
        self.client.call("VIF.create", vec![to_value(record)?]).await
    }
}

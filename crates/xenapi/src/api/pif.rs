use std::collections::HashMap;

use serde_json::to_value;

use crate::{
    error::Result,
    records::{NetworkRef, PifRecord, PifRef},
    XenClient,
};

/// Remote operations on the PIF class.
pub struct PifApi<'a> {
    client: &'a XenClient,
}

impl<'a> PifApi<'a> {
    pub(crate) fn new(client: &'a XenClient) -> PifApi<'a> {
        PifApi { client }
    }

    pub async fn get_all_records(&self) -> Result<HashMap<PifRef, PifRecord>> {
        self.client.call("PIF.get_all_records", vec![]).await
    }

    pub async fn get_network(&self, pif: &PifRef) -> Result<NetworkRef> {
        self.client
            .call("PIF.get_network", vec![to_value(pif)?])
            .await
    }
}

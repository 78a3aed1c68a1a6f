use serde_json::to_value;

use crate::{
    error::Result,
    records::{SrRecord, SrRef},
    XenClient,
};

/// Remote operations on the SR class.
pub struct SrApi<'a> {
    client: &'a XenClient,
}

impl<'a> SrApi<'a> {
    pub(crate) fn new(client: &'a XenClient) -> SrApi<'a> {
        SrApi { client }
    }

    pub async fn get_record(&self, sr: &SrRef) -> Result<SrRecord> {
        self.client.call("SR.get_record", vec![to_value(sr)?]).await
    }

    pub async fn get_by_name_label(&self, label: &str) -> Result<Vec<SrRef>> {
        self.client
            .call("SR.get_by_name_label", vec![to_value(label)?])
            .await
    }

    pub async fn get_by_uuid(&self, uuid: &str) -> Result<SrRef> {
        self.client
            .call("SR.get_by_uuid", vec![to_value(uuid)?])
            .await
    }
}

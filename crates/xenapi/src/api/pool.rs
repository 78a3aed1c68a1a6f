use serde_json::to_value;

use crate::{
    error::Result,
    records::{PoolRef, SrRef},
    XenClient,
};

/// Remote operations on the pool class. A standalone host is still a pool
/// with a single record.
pub struct PoolApi<'a> {
    client: &'a XenClient,
}

impl<'a> PoolApi<'a> {
    pub(crate) fn new(client: &'a XenClient) -> PoolApi<'a> {
        PoolApi { client }
    }

    pub async fn get_all(&self) -> Result<Vec<PoolRef>> {
        self.client.call("pool.get_all", vec![]).await
    }

    pub async fn get_default_sr(&self, pool: &PoolRef) -> Result<SrRef> {
        self.client
            .call("pool.get_default_SR", vec![to_value(pool)?])
            .await
    }
}

use serde_json::to_value;

use crate::{error::Result, records::NetworkRef, XenClient};

/// Remote operations on the network class.
pub struct NetworkApi<'a> {
    client: &'a XenClient,
}

impl<'a> NetworkApi<'a> {
    pub(crate) fn new(client: &'a XenClient) -> NetworkApi<'a> {
        NetworkApi { client }
    }

    pub async fn get_name_label(&self, network: &NetworkRef) -> Result<String> {
        self.client
            .call("network.get_name_label", vec![to_value(network)?])
            .await
    }
}

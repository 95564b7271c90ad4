// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use compudb_api::Client;
use compudb_app::{Company, Computer, ComputerId, SortSpec};
use compudb_tui::AppRuntime;
use std::time::Duration;

/// The production runtime: every view operation becomes one HTTP exchange
/// with the catalog server.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::new(base_url, timeout)?,
        })
    }
}

impl AppRuntime for ApiRuntime {
    fn list_computers(&mut self, sort: &SortSpec) -> Result<Vec<Computer>> {
        self.client.list_computers(sort)
    }

    fn fetch_computer(&mut self, id: ComputerId) -> Result<Computer> {
        self.client.get_computer(id)
    }

    fn create_computer(&mut self, record: &Computer) -> Result<Computer> {
        self.client.create_computer(record)
    }

    fn update_computer(&mut self, record: &Computer) -> Result<Computer> {
        self.client.update_computer(record)
    }

    fn delete_computer(&mut self, id: ComputerId) -> Result<()> {
        self.client.delete_computer(id)
    }

    fn list_companies(&mut self) -> Result<Vec<Company>> {
        self.client.list_companies()
    }
}

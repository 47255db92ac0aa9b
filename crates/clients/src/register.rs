use chrono::NaiveDate;

use optistock_core::{ClientId, DomainError, DomainResult};

use crate::client::{Client, ClientDetails};

/// In-memory client register of the shop.
#[derive(Debug, Clone, Default)]
pub struct ClientRegister {
    clients: Vec<Client>,
}

impl ClientRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client seen `today`. Ids follow the register size, starting at 1.
    pub fn add(&mut self, details: ClientDetails, today: NaiveDate) -> DomainResult<&Client> {
        let raw = u32::try_from(self.clients.len() + 1)
            .map_err(|_| DomainError::invariant("client register is full"))?;
        let id = ClientId::new(raw);
        if self.get(id).is_some() {
            return Err(DomainError::conflict(format!("client {id} already exists")));
        }

        let client = Client::open(id, details, today)?;
        tracing::info!(client = %client.id(), name = client.name(), "client added");
        self.clients.push(client);
        Ok(&self.clients[self.clients.len() - 1])
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id() == id)
    }

    pub fn list(&self) -> &[Client] {
        &self.clients
    }

    pub fn update(&mut self, id: ClientId, details: ClientDetails) -> DomainResult<&Client> {
        let client = self.get_mut(id)?;
        client.update(details)?;
        tracing::debug!(client = %id, "client updated");
        Ok(&*client)
    }

    pub fn record_visit(&mut self, id: ClientId, date: NaiveDate) -> DomainResult<()> {
        self.get_mut(id)?.record_visit(date);
        Ok(())
    }

    /// Case-insensitive search on name or email.
    pub fn search(&self, term: &str) -> Vec<&Client> {
        let needle = term.trim().to_lowercase();
        self.clients
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name().to_lowercase().contains(&needle)
                    || c.email().to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn get_mut(&mut self, id: ClientId) -> DomainResult<&mut Client> {
        self.clients
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(DomainError::not_found)
    }
}

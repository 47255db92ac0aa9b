use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use optistock_core::{ClientId, DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    /// Waiting on a prescription or an order.
    Pending,
}

impl ClientStatus {
    pub fn label(self) -> &'static str {
        match self {
            ClientStatus::Active => "Actif",
            ClientStatus::Pending => "En attente",
        }
    }
}

/// Client file as entered at the counter.
///
/// Name, email and phone are required; the rest is free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Free-form prescription summary, e.g. `Myopie -2.5`.
    pub prescription: String,
    pub notes: String,
}

impl ClientDetails {
    pub fn validate(&self) -> DomainResult<()> {
        let missing = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(field, _)| field)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "required client fields missing: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    #[serde(flatten)]
    details: ClientDetails,
    last_visit: NaiveDate,
    status: ClientStatus,
}

impl Client {
    /// New active client whose last visit is `today`.
    pub fn open(id: ClientId, details: ClientDetails, today: NaiveDate) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id,
            details: details.normalized(),
            last_visit: today,
            status: ClientStatus::Active,
        })
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn details(&self) -> &ClientDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn email(&self) -> &str {
        &self.details.email
    }

    pub fn last_visit(&self) -> NaiveDate {
        self.last_visit
    }

    pub fn status(&self) -> ClientStatus {
        self.status
    }

    /// Uppercase initials of the name, as shown on the client card.
    pub fn initials(&self) -> String {
        self.details
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Replace the client file. Id, last visit and status are kept.
    pub fn update(&mut self, details: ClientDetails) -> DomainResult<()> {
        details.validate()?;
        self.details = details.normalized();
        Ok(())
    }

    pub fn record_visit(&mut self, date: NaiveDate) {
        if date > self.last_visit {
            self.last_visit = date;
        }
    }

    pub fn set_status(&mut self, status: ClientStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marie() -> ClientDetails {
        ClientDetails {
            name: "Marie Dubois".to_string(),
            email: "marie.dubois@email.com".to_string(),
            phone: "06 12 34 56 78".to_string(),
            address: "123 rue de la Paix, 75001 Paris".to_string(),
            prescription: "Myopie -2.5".to_string(),
            notes: String::new(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn new_client_is_active() {
        let client = Client::open(ClientId::new(1), marie(), today()).unwrap();
        assert_eq!(client.status(), ClientStatus::Active);
        assert_eq!(client.status().label(), "Actif");
        assert_eq!(client.last_visit(), today());
        assert_eq!(client.initials(), "MD");
    }

    #[test]
    fn name_email_and_phone_are_required() {
        let mut details = marie();
        details.email = " ".to_string();
        details.phone = String::new();

        let err = Client::open(ClientId::new(1), details, today()).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("required client fields missing: email, phone")
        );
    }

    #[test]
    fn optional_fields_may_be_blank() {
        let details = ClientDetails {
            address: String::new(),
            prescription: String::new(),
            ..marie()
        };
        assert!(details.validate().is_ok());
    }

    #[test]
    fn update_keeps_identity_and_visit() {
        let mut client = Client::open(ClientId::new(4), marie(), today()).unwrap();
        client.set_status(ClientStatus::Pending);

        let mut details = marie();
        details.notes = "Préfère les montures en titane".to_string();
        client.update(details).unwrap();

        assert_eq!(client.id(), ClientId::new(4));
        assert_eq!(client.status(), ClientStatus::Pending);
        assert_eq!(client.details().notes, "Préfère les montures en titane");

        let mut blank = marie();
        blank.name = String::new();
        assert!(client.update(blank).is_err());
        assert_eq!(client.name(), "Marie Dubois");
    }

    #[test]
    fn visits_only_move_forward() {
        let mut client = Client::open(ClientId::new(1), marie(), today()).unwrap();
        client.record_visit(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(client.last_visit(), today());
        client.record_visit(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(client.last_visit(), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn serializes_flat() {
        let client = Client::open(ClientId::new(2), marie(), today()).unwrap();
        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["email"], "marie.dubois@email.com");
        assert_eq!(json["status"], "active");
    }
}

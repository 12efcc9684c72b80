//! Profile and address book handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use glowishii_core::{Address, AddressId, Gender, types::address::DEFAULT_COUNTRY};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, push_flash};
use crate::models::Flash;
use crate::routes::{safe_redirect, sentence};
use crate::state::AppState;

/// Address form values for templates.
#[derive(Clone, Default)]
pub struct AddressFormView {
    /// Form target.
    pub action: String,
    /// Where to go after saving.
    pub next: String,
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub phone: String,
}

impl AddressFormView {
    /// An empty form for a new address.
    #[must_use]
    pub fn blank(next: &str) -> Self {
        Self {
            action: "/profile/addresses".to_string(),
            next: next.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            ..Self::default()
        }
    }

    /// A form prefilled with a saved address.
    #[must_use]
    pub fn edit(id: &AddressId, address: &Address) -> Self {
        Self {
            action: format!("/profile/addresses/{id}"),
            next: "/profile".to_string(),
            name: address.name.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            pincode: address.pincode.clone(),
            country: address.country.clone(),
            phone: address.phone.clone(),
        }
    }
}

/// Saved address display data.
#[derive(Clone)]
pub struct AddressView {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub phone: String,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileTemplate {
    pub page: PageContext,
    pub name: String,
    pub email: String,
    pub verified: bool,
    pub phone: String,
    pub gender: String,
    pub addresses: Vec<AddressView>,
    pub address_form: AddressFormView,
}

/// Address edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/address_edit.html")]
pub struct AddressEditTemplate {
    pub page: PageContext,
    pub address_form: AddressFormView,
}

/// Address form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddressForm {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub phone: String,
    pub next: Option<String>,
}

impl AddressForm {
    /// Build a normalized address, ready to validate. A blank country
    /// becomes the default.
    #[must_use]
    pub fn to_address(&self) -> Address {
        Address {
            id: None,
            name: self.name.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
            country: self.country.clone(),
            phone: self.phone.clone(),
        }
        .normalized()
    }
}

fn address_views(addresses: &[Address]) -> Vec<AddressView> {
    addresses
        .iter()
        .filter_map(|address| {
            address.id.as_ref().map(|id| AddressView {
                id: id.to_string(),
                name: address.name.clone(),
                summary: address.to_string(),
                phone: address.phone.clone(),
            })
        })
        .collect()
}

fn parse_address_id(raw: &str) -> Result<AddressId> {
    AddressId::parse(raw).map_err(|_| AppError::NotFound("address".to_string()))
}

/// Display profile with saved addresses.
#[instrument(skip(state, user, page))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> Result<ProfileTemplate> {
    let profile = state.api().me(&user.api_session).await?;

    Ok(ProfileTemplate {
        page,
        name: profile.name.clone(),
        email: profile.email.to_string(),
        verified: profile.verified,
        phone: profile.phone.clone().unwrap_or_default(),
        gender: match profile.gender {
            Some(Gender::Male) => "Male".to_string(),
            Some(Gender::Female) => "Female".to_string(),
            None => String::new(),
        },
        addresses: address_views(&profile.addresses),
        address_form: AddressFormView::blank("/profile"),
    })
}

/// Save a new address.
#[instrument(skip(state, session, user))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<AddressForm>,
) -> Result<Redirect> {
    let back = safe_redirect(form.next.as_deref(), "/profile");
    let address = form.to_address();

    if let Err(e) = address.validate() {
        push_flash(&session, Flash::error(sentence(&e))).await;
        return Ok(Redirect::to(&back));
    }

    match state.api().add_address(&user.api_session, &address).await {
        Ok(saved) => {
            tracing::info!(user_id = %user.id, count = saved.len(), "Address added");
            push_flash(&session, Flash::success("Address saved successfully")).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user.id, "Failed to add address");
            push_flash(&session, Flash::error(e.user_message())).await;
        }
    }
    Ok(Redirect::to(&back))
}

/// Display the edit form for a saved address.
#[instrument(skip(state, user, page))]
pub async fn edit_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<AddressEditTemplate> {
    let id = parse_address_id(&id)?;
    let profile = state.api().me(&user.api_session).await?;
    let address = profile
        .addresses
        .iter()
        .find(|address| address.id.as_ref() == Some(&id))
        .ok_or_else(|| AppError::NotFound("address".to_string()))?;

    Ok(AddressEditTemplate {
        page,
        address_form: AddressFormView::edit(&id, address),
    })
}

/// Update a saved address.
#[instrument(skip(state, session, user))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<AddressForm>,
) -> Result<Redirect> {
    let id = parse_address_id(&id)?;
    let address = form.to_address();

    if let Err(e) = address.validate() {
        push_flash(&session, Flash::error(sentence(&e))).await;
        return Ok(Redirect::to(&format!("/profile/addresses/{id}/edit")));
    }

    match state
        .api()
        .update_address(&user.api_session, &id, &address)
        .await
    {
        Ok(_) => push_flash(&session, Flash::success("Address updated successfully")).await,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user.id, address_id = %id, "Failed to update address");
            push_flash(&session, Flash::error(e.user_message())).await;
        }
    }
    Ok(Redirect::to("/profile"))
}

/// Delete a saved address.
#[instrument(skip(state, session, user))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_address_id(&id)?;

    match state.api().delete_address(&user.api_session, &id).await {
        Ok(_) => push_flash(&session, Flash::success("Address deleted")).await,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user.id, address_id = %id, "Failed to delete address");
            push_flash(&session, Flash::error(e.user_message())).await;
        }
    }
    Ok(Redirect::to("/profile"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults_country_and_normalizes() {
        let form = AddressForm {
            name: " Asha Rao ".to_string(),
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560 001".to_string(),
            phone: "+91 98450 12345".to_string(),
            ..AddressForm::default()
        };
        let address = form.to_address();
        assert_eq!(address.country, "India");
        assert_eq!(address.pincode, "560001");
        assert_eq!(address.name, "Asha Rao");
        assert!(address.validate().is_ok());
    }

    #[test]
    fn test_unsaved_addresses_are_not_listed() {
        let address = Address {
            name: "Asha Rao".to_string(),
            ..Address::default()
        };
        assert!(address_views(&[address]).is_empty());
    }
}

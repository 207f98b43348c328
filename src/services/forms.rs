use serde::Deserialize;
use url::form_urlencoded;

use crate::services::messages::{CustomerDetails, PizzaOrder, SummarizeOrder};
use crate::types::{AppError, CatalogRef};

fn parse_id(field: &str, value: &str) -> Result<i32, AppError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|err| AppError::invalid_form(field, err))
}

/// Fields posted by the order form (`/commandeResume`).
#[derive(Deserialize, Debug)]
pub struct OrderForm {
    pub nom: String,
    pub telephone: String,
    pub adresse: String,
    pub croute_id: String,
    pub sauce_id: String,
    #[serde(default)]
    pub garniture1: Option<String>,
    #[serde(default)]
    pub garniture2: Option<String>,
    #[serde(default)]
    pub garniture3: Option<String>,
    #[serde(default)]
    pub garniture4: Option<String>,
}

impl TryFrom<OrderForm> for SummarizeOrder {
    type Error = AppError;

    fn try_from(form: OrderForm) -> Result<Self, Self::Error> {
        let crust_id = parse_id("croute_id", &form.croute_id)?;
        let sauce_id = parse_id("sauce_id", &form.sauce_id)?;

        let mut topping_ids = Vec::new();
        let selects = [
            ("garniture1", form.garniture1),
            ("garniture2", form.garniture2),
            ("garniture3", form.garniture3),
            ("garniture4", form.garniture4),
        ];
        for (field, value) in selects {
            match value.as_deref().map(str::trim) {
                None | Some("") => continue,
                Some(value) => topping_ids.push(parse_id(field, value)?),
            }
        }

        Ok(SummarizeOrder {
            customer: CustomerDetails {
                name: form.nom,
                phone: form.telephone,
                address: form.adresse,
            },
            crust_id,
            sauce_id,
            topping_ids,
        })
    }
}

/// Decodes the confirmation form (`/validation`). `garnitures` repeats, which
/// `web::Form` cannot express, so the body is walked pair by pair.
///
/// Crust and sauce are taken from `croute_id` / `sauce_id` when present and
/// fall back to the `croute` / `sauce` display names.
pub fn parse_confirmation(body: &[u8]) -> Result<PizzaOrder, AppError> {
    let mut name = None;
    let mut phone = None;
    let mut address = None;
    let mut crust_id = None;
    let mut crust_name = None;
    let mut sauce_id = None;
    let mut sauce_name = None;
    let mut topping_ids = Vec::new();

    for (key, value) in form_urlencoded::parse(body) {
        match key.as_ref() {
            "nom" => name = Some(value.into_owned()),
            "telephone" => phone = Some(value.into_owned()),
            "adresse" => address = Some(value.into_owned()),
            "croute_id" if !value.trim().is_empty() => crust_id = Some(parse_id("croute_id", &value)?),
            "croute" => crust_name = Some(value.into_owned()),
            "sauce_id" if !value.trim().is_empty() => sauce_id = Some(parse_id("sauce_id", &value)?),
            "sauce" => sauce_name = Some(value.into_owned()),
            "garnitures" if !value.trim().is_empty() => {
                topping_ids.push(parse_id("garnitures", &value)?)
            }
            _ => {}
        }
    }

    let required = |field: &str, value: Option<String>| {
        value.ok_or_else(|| AppError::invalid_form(field, "missing"))
    };
    let reference = |field: &str, id: Option<i32>, name: Option<String>| match (id, name) {
        (Some(id), _) => Ok(CatalogRef::Id(id)),
        (None, Some(name)) => Ok(CatalogRef::Name(name)),
        (None, None) => Err(AppError::invalid_form(field, "missing")),
    };

    Ok(PizzaOrder {
        customer: CustomerDetails {
            name: required("nom", name)?,
            phone: required("telephone", phone)?,
            address: required("adresse", address)?,
        },
        crust: reference("croute", crust_id, crust_name)?,
        sauce: reference("sauce", sauce_id, sauce_name)?,
        topping_ids,
    })
}

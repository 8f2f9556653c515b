//! Menu catalog rules.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Checked, FieldError, collect, fail, non_negative_number, required_text, text};
use crate::domain::{Category, CustomizationOption, MenuItemPatch, NewMenuItem, NutritionalInfo};

/// A menu item body as submitted to the admin endpoints. Fields stay as raw
/// JSON so a wrong type is reported per field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: Option<Value>,
    pub description: Option<Value>,
    pub price: Option<Value>,
    pub category: Option<Value>,
    pub image_url: Option<Value>,
    pub is_available: Option<Value>,
    pub nutritional_info: Option<Value>,
    pub customization_options: Option<Value>,
}

/// Fields that are optional on every request.
struct Extras {
    image_url: Option<String>,
    is_available: Option<bool>,
    nutritional_info: Option<NutritionalInfo>,
    customization_options: Option<Vec<CustomizationOption>>,
}

/// Validate a complete menu item for insertion.
pub fn validate_menu_item(input: &MenuItemInput) -> Result<NewMenuItem, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = collect(check_name(input.name.as_ref()), &mut errors);
    let description = collect(check_description(input.description.as_ref()), &mut errors);
    let price = collect(check_price(input.price.as_ref()), &mut errors);
    let category = collect(check_category(input.category.as_ref()), &mut errors);
    let extras = collect(check_extras(input), &mut errors);

    match (name, description, price, category, extras) {
        (Some(name), Some(description), Some(price), Some(category), Some(extras))
            if errors.is_empty() =>
        {
            Ok(NewMenuItem {
                name,
                description,
                price,
                category,
                image_url: extras.image_url,
                is_available: extras.is_available.unwrap_or(true),
                nutritional_info: extras.nutritional_info,
                customization_options: extras.customization_options.unwrap_or_default(),
            })
        }
        _ => Err(errors),
    }
}

/// Validate a partial update. Only the supplied fields are checked.
pub fn validate_menu_patch(input: &MenuItemInput) -> Result<MenuItemPatch, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = supplied(input.name.as_ref())
        .and_then(|name| collect(check_name(Some(name)), &mut errors));
    let description = supplied(input.description.as_ref())
        .and_then(|text| collect(check_description(Some(text)), &mut errors));
    let price = supplied(input.price.as_ref())
        .and_then(|price| collect(check_price(Some(price)), &mut errors));
    let category = supplied(input.category.as_ref())
        .and_then(|category| collect(check_category(Some(category)), &mut errors));
    let extras = collect(check_extras(input), &mut errors);

    match extras {
        Some(extras) if errors.is_empty() => Ok(MenuItemPatch {
            name,
            description,
            price,
            category,
            image_url: extras.image_url,
            is_available: extras.is_available,
            nutritional_info: extras.nutritional_info,
            customization_options: extras.customization_options,
        }),
        _ => Err(errors),
    }
}

/// `null` means "not supplied" in a patch.
fn supplied(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn check_extras(input: &MenuItemInput) -> Checked<Extras> {
    let mut errors = Vec::new();

    let image_url = collect(
        text(input.image_url.as_ref(), "imageUrl", "Image URL must be text"),
        &mut errors,
    )
    .flatten()
    .filter(|url| !url.is_empty())
    .map(str::to_string);
    let is_available =
        collect(check_availability(input.is_available.as_ref()), &mut errors).flatten();
    let nutritional_info = collect(
        structured(
            input.nutritional_info.as_ref(),
            "nutritionalInfo",
            "Invalid nutritional information",
        ),
        &mut errors,
    )
    .flatten();
    let customization_options = collect(
        structured(
            input.customization_options.as_ref(),
            "customizationOptions",
            "Invalid customization options",
        ),
        &mut errors,
    )
    .flatten();

    if errors.is_empty() {
        Ok(Extras {
            image_url,
            is_available,
            nutritional_info,
            customization_options,
        })
    } else {
        Err(errors)
    }
}

fn check_availability(value: Option<&Value>) -> Checked<Option<bool>> {
    match supplied(value) {
        None => Ok(None),
        Some(Value::Bool(available)) => Ok(Some(*available)),
        Some(_) => fail("isAvailable", "Availability must be true or false"),
    }
}

/// Decode a nested object, reporting a shape mismatch against `field`.
fn structured<T: DeserializeOwned>(
    value: Option<&Value>,
    field: &str,
    message: &str,
) -> Checked<Option<T>> {
    match supplied(value) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .or_else(|_| fail(field, message)),
    }
}

fn check_name(value: Option<&Value>) -> Checked<String> {
    required_text(value, "name", "Name is required")
}

fn check_description(value: Option<&Value>) -> Checked<String> {
    required_text(value, "description", "Description is required")
}

fn check_price(value: Option<&Value>) -> Checked<f64> {
    non_negative_number(value, "price", "Price must be a positive number")
}

fn check_category(value: Option<&Value>) -> Checked<Category> {
    value
        .and_then(Value::as_str)
        .and_then(|category| category.trim().parse::<Category>().ok())
        .map_or_else(|| fail("category", "Invalid category"), Ok)
}

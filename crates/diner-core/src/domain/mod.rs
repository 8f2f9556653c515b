//! Domain entities - the core business objects.

mod menu;
mod order;
mod phone;

pub use menu::{
    Category, CustomizationChoice, CustomizationOption, MenuItem, MenuItemPatch, NewMenuItem,
    NutritionalInfo, group_by_category,
};
pub use order::{NewOrder, Order, OrderItem, OrderStatus, UnknownStatus};
pub use phone::{InvalidPhoneNumber, PhoneNumber, normalize};

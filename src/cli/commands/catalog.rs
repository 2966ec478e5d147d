use cabin_core::DataService;
use cabin_domain::Settings;

use super::{usage_error, CommandDefinition};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::render;

const SETTING_KEYS: &str = "min-nights, max-nights, max-guests, breakfast-price";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("cabins", "List cabins", "cabins", cmd_cabins),
        CommandDefinition::new("guests", "List guests", "guests", cmd_guests),
        CommandDefinition::new("settings", "Show booking settings", "settings", cmd_settings),
        CommandDefinition::new(
            "add-cabin",
            "Add a cabin",
            "add-cabin <name> <max-capacity> <regular-price> [discount]",
            cmd_add_cabin,
        ),
        CommandDefinition::new(
            "add-guest",
            "Add a guest",
            "add-guest \"<full name>\" [email]",
            cmd_add_guest,
        ),
        CommandDefinition::new(
            "set-setting",
            "Change a booking setting",
            "set-setting <min-nights|max-nights|max-guests|breakfast-price> <value>",
            cmd_set_setting,
        ),
    ]
}

fn cmd_cabins(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let cabins = context.store.list_cabins()?;
    render::print_cabins(&cabins, &context.formatter());
    Ok(())
}

fn cmd_guests(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let guests = context.store.list_guests()?;
    render::print_guests(&guests);
    Ok(())
}

fn cmd_settings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let settings = context.store.settings()?;
    render::print_settings(&settings, &context.formatter());
    Ok(())
}

fn cmd_add_cabin(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "add-cabin <name> <max-capacity> <regular-price> [discount]";
    let (name, capacity, price, discount) = match args {
        [name, capacity, price] => (*name, *capacity, *price, "0"),
        [name, capacity, price, discount] => (*name, *capacity, *price, *discount),
        _ => return Err(usage_error(usage)),
    };
    let cabin = context.store.add_cabin(
        name,
        parse_number(capacity, "max-capacity")?,
        parse_amount(price, "regular-price")?,
        parse_amount(discount, "discount")?,
    )?;
    context.reload_reference();
    output::success(format!("Cabin #{} `{}` added", cabin.id, cabin.name));
    Ok(())
}

fn cmd_add_guest(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, email) = match args {
        [name] => (*name, ""),
        [name, email] => (*name, *email),
        _ => return Err(usage_error("add-guest \"<full name>\" [email]")),
    };
    let guest = context.store.add_guest(name, email)?;
    context.reload_reference();
    output::success(format!("Guest #{} `{}` added", guest.id, guest.full_name));
    Ok(())
}

fn cmd_set_setting(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value] = args else {
        return Err(usage_error(
            "set-setting <min-nights|max-nights|max-guests|breakfast-price> <value>",
        ));
    };
    let current = context.store.settings()?;
    let updated = apply_setting(current, key, value)?;
    context.store.update_settings(updated)?;
    context.reload_reference();
    output::success(format!("Setting `{key}` updated to {value}"));
    Ok(())
}

fn apply_setting(mut settings: Settings, key: &str, value: &str) -> Result<Settings, CommandError> {
    match key.to_ascii_lowercase().as_str() {
        "min-nights" | "minbookinglength" => {
            settings.min_booking_length = parse_number(value, key)?
        }
        "max-nights" | "maxbookinglength" => {
            settings.max_booking_length = parse_number(value, key)?
        }
        "max-guests" | "maxguestsperbooking" => {
            settings.max_guests_per_booking = parse_number(value, key)?
        }
        "breakfast-price" | "breakfastprice" => {
            settings.breakfast_price = parse_amount(value, key)?
        }
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown setting `{key}`. Expected one of: {SETTING_KEYS}"
            )))
        }
    }
    Ok(settings)
}

fn parse_number(raw: &str, field: &str) -> Result<u32, CommandError> {
    raw.parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{field}` must be a whole number, got `{raw}`"))
    })
}

fn parse_amount(raw: &str, field: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "`{field}` must be a non-negative amount, got `{raw}`"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_accept_dashed_and_camel_keys() {
        let settings = apply_setting(Settings::default(), "min-nights", "2").unwrap();
        assert_eq!(settings.min_booking_length, 2);

        let settings = apply_setting(settings, "breakfastPrice", "12.5").unwrap();
        assert_eq!(settings.breakfast_price, 12.5);
    }

    #[test]
    fn unknown_keys_and_bad_values_are_rejected() {
        assert!(apply_setting(Settings::default(), "wifi", "1").is_err());
        assert!(apply_setting(Settings::default(), "max-guests", "-3").is_err());
        assert!(apply_setting(Settings::default(), "breakfast-price", "free").is_err());
    }
}

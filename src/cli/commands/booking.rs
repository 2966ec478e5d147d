use cabin_core::{
    BookingFilter, BookingForm, BookingSort, CheckInOptions, DeleteOutcome, LifecycleAction,
};
use cabin_domain::BookingStatus;

use super::{parse_args, parse_id, usage_error, CommandDefinition};
use crate::cli::context::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::render;

const BOOKINGS_USAGE: &str = concat!(
    "bookings [all|unconfirmed|checked-in|checked-out] ",
    "[startDate|totalPrice|createdAt-asc|desc]"
);
const CREATE_USAGE: &str =
    "create <start> <end> <cabin-id> <guest-id> <guests> [--breakfast] [--paid] [--note text]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "bookings",
            "List bookings, optionally by status and sort",
            BOOKINGS_USAGE,
            cmd_bookings,
        ),
        CommandDefinition::new("booking", "Show one booking", "booking <id>", cmd_booking),
        CommandDefinition::new("create", "Create a booking", CREATE_USAGE, cmd_create),
        CommandDefinition::new(
            "checkin",
            "Check a guest in",
            "checkin <id> [--breakfast] [--paid]",
            cmd_check_in,
        ),
        CommandDefinition::new("checkout", "Check a guest out", "checkout <id>", cmd_check_out),
        CommandDefinition::new(
            "delete",
            "Delete a booking after confirmation",
            "delete <id>",
            cmd_delete,
        ),
        CommandDefinition::new(
            "confirm",
            "Confirm the pending deletion",
            "confirm",
            cmd_confirm,
        ),
        CommandDefinition::new("cancel", "Keep the booking pending deletion", "cancel", cmd_cancel),
    ]
}

fn cmd_bookings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut filter = BookingFilter::default();
    for arg in args {
        if arg.eq_ignore_ascii_case("all") {
            continue;
        }
        if let Some(status) = BookingStatus::parse(arg) {
            filter.status = Some(status);
        } else if let Some(sort) = BookingSort::parse(arg) {
            filter.sort = sort;
        } else {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown status or sort `{arg}`"
            )));
        }
    }

    let rows = context.bookings(filter)?;
    render::print_bookings(&rows, &context.reference, &context.formatter());
    Ok(())
}

fn cmd_booking(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(usage_error("booking <id>"));
    };
    let booking = context.booking(parse_id(raw, "booking")?)?;
    render::print_booking_detail(&booking, &context.reference, &context.formatter());
    Ok(())
}

fn cmd_create(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args)?;
    parsed.only(&["--breakfast", "--paid"])?;
    let [start, end, cabin, guest, guests] = parsed.positional.as_slice() else {
        return Err(usage_error(CREATE_USAGE));
    };

    let form = BookingForm {
        start_date: start.to_string(),
        end_date: end.to_string(),
        num_guests: guests.to_string(),
        cabin_id: cabin.to_string(),
        guest_id: guest.to_string(),
        has_breakfast: parsed.has("--breakfast"),
        is_paid: parsed.has("--paid"),
        observations: parsed.note.unwrap_or_default().to_string(),
    };

    let booking = context
        .controller
        .create_from_form(&form, &context.reference, context.clock())?;
    context.action_succeeded(LifecycleAction::Create, booking.id);
    output::info(format!(
        "{} night(s), total {}",
        booking.num_nights,
        context.formatter().money(booking.total_price)
    ));
    Ok(())
}

fn cmd_check_in(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args)?;
    parsed.only(&["--breakfast", "--paid"])?;
    let [raw] = parsed.positional.as_slice() else {
        return Err(usage_error("checkin <id> [--breakfast] [--paid]"));
    };
    let booking = context.booking(parse_id(raw, "booking")?)?;

    let mut options = CheckInOptions {
        add_breakfast: parsed.has("--breakfast"),
        confirm_paid: parsed.has("--paid"),
    };
    if !options.confirm_paid && !booking.is_paid && context.mode == CliMode::Interactive {
        options.confirm_paid = context.confirm(&format!(
            "Has the guest paid the total of {}?",
            context.formatter().money(booking.total_price)
        ))?;
    }

    let updated = context.controller.check_in_with(
        &booking,
        options,
        context.reference.settings.as_ref(),
    )?;
    context.action_succeeded(LifecycleAction::CheckIn, updated.id);
    Ok(())
}

fn cmd_check_out(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(usage_error("checkout <id>"));
    };
    let booking = context.booking(parse_id(raw, "booking")?)?;
    let updated = context.controller.check_out(&booking)?;
    context.action_succeeded(LifecycleAction::CheckOut, updated.id);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(usage_error("delete <id>"));
    };
    let id = parse_id(raw, "booking")?;
    let booking = context.booking(id)?;
    let ticket = context.delete_flow.open(booking.id);

    if context.mode == CliMode::Interactive {
        let prompt = format!(
            "Delete booking #{} permanently? This cannot be undone.",
            booking.id
        );
        if context.confirm(&prompt)? {
            return finish_delete(context, ticket);
        }
        context.delete_flow.cancel();
        output::info("Deletion cancelled.");
        return Ok(());
    }

    output::warning(format!(
        "Delete booking #{} permanently? Type `confirm` to delete or `cancel` to keep it.",
        booking.id
    ));
    Ok(())
}

fn cmd_confirm(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(ticket) = context.delete_flow.pending_ticket() else {
        output::warning("No deletion is pending.");
        return Ok(());
    };
    finish_delete(context, ticket)
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.delete_flow.cancel() {
        output::info("Deletion cancelled.");
    } else {
        output::warning("No deletion is pending.");
    }
    Ok(())
}

fn finish_delete(context: &mut ShellContext, ticket: uuid::Uuid) -> CommandResult {
    match context.delete_flow.confirm(ticket, &context.controller) {
        DeleteOutcome::Deleted(id) => {
            context.action_succeeded(LifecycleAction::Delete, id);
            Ok(())
        }
        DeleteOutcome::Failed(err) => Err(err.into()),
        DeleteOutcome::Ignored => {
            output::warning("No deletion is pending.");
            Ok(())
        }
    }
}

use std::collections::HashMap;

use twilight_model::application::interaction::application_command::{CommandDataOption, CommandOptionValue};
use twilight_model::application::interaction::{Interaction, InteractionData, InteractionType};
use twilight_model::guild::Permissions;

use crate::models::{SlashInvocation, SlashOptionValue};

/// Flattens options into the invocation. A subcommand sets `subcommand` and contributes
/// its own options; option kinds the bot never registers are dropped.
fn collect_options(options: &[CommandDataOption], invocation: &mut SlashInvocation) {
    for opt in options {
        let value = match &opt.value {
            CommandOptionValue::Integer(v) => SlashOptionValue::Integer(*v),
            CommandOptionValue::String(v) => SlashOptionValue::String(v.clone()),
            CommandOptionValue::Boolean(v) => SlashOptionValue::Boolean(*v),
            CommandOptionValue::Channel(id) => SlashOptionValue::Channel(id.to_string()),
            CommandOptionValue::SubCommand(nested) => {
                invocation.subcommand = Some(opt.name.clone());
                collect_options(nested, invocation);
                continue;
            }
            _ => continue,
        };
        invocation.options.insert(opt.name.clone(), value);
    }
}

/// Slash command interactions only; components, autocomplete and pings yield `None`.
pub fn invocation_from_interaction(interaction: &Interaction) -> Option<SlashInvocation> {
    if interaction.kind != InteractionType::ApplicationCommand {
        return None;
    }
    let Some(InteractionData::ApplicationCommand(data)) = &interaction.data else {
        return None;
    };

    let mut invocation = SlashInvocation {
        name: data.name.clone(),
        subcommand: None,
        options: HashMap::new(),
        user_id: interaction.author_id().map(|id| id.to_string()).unwrap_or_default(),
        is_admin: interaction
            .member
            .as_ref()
            .and_then(|m| m.permissions)
            .is_some_and(|p| p.contains(Permissions::ADMINISTRATOR)),
    };
    collect_options(&data.options, &mut invocation);
    Some(invocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twilight_model::id::Id;

    fn opt(name: &str, value: CommandOptionValue) -> CommandDataOption {
        CommandDataOption {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn flattens_subcommand_options() {
        let mut inv = SlashInvocation::new("setup");
        let options = vec![opt(
            "live",
            CommandOptionValue::SubCommand(vec![opt("channel", CommandOptionValue::Channel(Id::new(42)))]),
        )];
        collect_options(&options, &mut inv);

        assert_eq!(inv.subcommand.as_deref(), Some("live"));
        assert_eq!(inv.channel("channel"), Some("42"));
    }

    #[test]
    fn keeps_scalar_options() {
        let mut inv = SlashInvocation::new("clips");
        collect_options(&[opt("count", CommandOptionValue::Integer(4))], &mut inv);
        assert_eq!(inv.integer("count"), Some(4));
        assert!(inv.subcommand.is_none());
    }
}

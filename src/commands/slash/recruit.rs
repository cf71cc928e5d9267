//! # Recruit Command
//!
//! Start composing a recruitment post.

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_recruit_command()]
}

fn create_recruit_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("recruit")
        .description("Write a recruitment post");
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_recruit_command() {
        let commands = create_commands();
        assert_eq!(commands.len(), 1);

        let name = commands[0].0.get("name").unwrap().as_str().unwrap();
        assert_eq!(name, "recruit");
    }
}

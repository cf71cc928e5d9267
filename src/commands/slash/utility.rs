use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    let mut ping = CreateApplicationCommand::default();
    ping.name("ping").description("Check that the bot is responding");
    vec![ping]
}

use clap::{
    builder::{styling::AnsiColor, Styles},
    CommandFactory, Parser,
};
use cowcli::cmd::submit::SubmitCommand;
use cowcli_version::SHORT_VERSION;

/// Exit code when the order-definition argument is missing.
const EXIT_USAGE: i32 = 99;

#[derive(Debug, Parser)]
#[command(
    name = "cowcli",
    about = "Limit-order submission workflow for the CoW settlement protocol.",
    version = SHORT_VERSION.as_str(),
    term_width = 80,
    styles = get_color_style()
)]
pub struct Cli {
    #[clap(flatten)]
    pub submit: SubmitCommand,
}

impl Cli {
    pub fn run(self) -> eyre::Result<()> {
        if self.submit.order_file.is_none() {
            Cli::command().print_help()?;
            std::process::exit(EXIT_USAGE);
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        runtime.block_on(self.submit.execute())
    }
}

fn get_color_style() -> Styles {
    Styles::styled()
        .usage(AnsiColor::Green.on_default().bold().underline())
        .header(AnsiColor::Yellow.on_default().bold().underline())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

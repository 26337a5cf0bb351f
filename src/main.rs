use clap::Parser;
use folio::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping to `head` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    folio::logging::init(global.verbose);

    match cli.command {
        Commands::Init(args) => folio::cli::commands::init::run(args),
        Commands::Import(args) => folio::cli::commands::import::run(args, &global),
        Commands::Review(cmd) => folio::cli::commands::review::run(cmd, &global),
        Commands::Config(cmd) => folio::cli::commands::config::run(cmd, &global),
    }
}

use super::super::args::*;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => super::run::run(args).await,
        Command::Exec(args) => super::exec::run(args).await,
        Command::Languages(args) => super::languages::run(args),
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON instead of tables"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn account_arg() -> Arg {
    Arg::new("account")
        .long("account")
        .required(true)
        .help("Account id")
}

fn amount_arg() -> Arg {
    Arg::new("amount")
        .long("amount")
        .required(true)
        .allow_hyphen_values(true)
        .help("Amount, must be positive")
}

pub fn build_cli() -> Command {
    Command::new("bankdash")
        .about("Terminal dashboard for the banking API")
        .version(clap::crate_version!())
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .env("BANKDASH_API_URL")
                .help("Base URL of the API, e.g. http://localhost:5000/api"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(Command::new("init").about("Create the local state database"))
        .subcommand(
            Command::new("register")
                .about("Create a user account and open a session")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(Arg::new("first-name").long("first-name").required(true))
                .arg(Arg::new("last-name").long("last-name").required(true))
                .arg(Arg::new("phone").long("phone"))
                .arg(Arg::new("date-of-birth").long("date-of-birth").help("YYYY-MM-DD"))
                .arg(Arg::new("address").long("address")),
        )
        .subcommand(
            Command::new("login")
                .about("Open a session")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the session token"))
        .subcommand(json_flags(
            Command::new("profile").about("Show the signed-in user"),
        ))
        .subcommand(
            Command::new("password")
                .about("Change the password")
                .arg(Arg::new("current").long("current").required(true))
                .arg(Arg::new("new").long("new").required(true)),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Profile, accounts, summary and recent transactions")
                .arg(
                    Arg::new("tab")
                        .long("tab")
                        .value_parser(["deposit", "withdrawal", "transfer", "payment"])
                        .help("Form panel to show"),
                ),
        ))
        .subcommand(
            Command::new("account")
                .about("Accounts")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(
                    Command::new("show").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ))
                .subcommand(json_flags(Command::new("summary"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(value_parser!(u32).range(1..))
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("per-page")
                                .long("per-page")
                                .value_parser(value_parser!(u32).range(1..))
                                .default_value("10"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .value_parser(value_parser!(i64)),
                        ),
                ))
                .subcommand(
                    Command::new("deposit")
                        .arg(account_arg())
                        .arg(amount_arg())
                        .arg(Arg::new("description").long("description").default_value("")),
                )
                .subcommand(
                    Command::new("withdraw")
                        .arg(account_arg())
                        .arg(amount_arg())
                        .arg(Arg::new("description").long("description").default_value("")),
                )
                .subcommand(
                    Command::new("transfer")
                        .arg(account_arg())
                        .arg(Arg::new("iban").long("iban").required(true))
                        .arg(amount_arg())
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("recipient-name")
                                .long("recipient-name")
                                .default_value(""),
                        ),
                )
                .subcommand(
                    Command::new("pay")
                        .arg(account_arg())
                        .arg(Arg::new("merchant").long("merchant").required(true))
                        .arg(amount_arg())
                        .arg(Arg::new("category").long("category").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Client settings")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set-url").arg(Arg::new("url").required(true)))
                .subcommand(Command::new("reset-url")),
        )
}

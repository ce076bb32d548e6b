use clap::{value_parser, crate_version, Arg, ArgAction, Command, ValueHint};

const DEV_HELP: &str = "devices are given as UNIT:KIND:PATH, where KIND is `dir` for a folder
of PC64 files or `d64` for a disk image, e.g. `-d 8:dir:/var/tmp/c64iecd/8 -d 9:d64:games.d64`";
const CONFIG_LONG_HELP: &str = "JSON file with keys `port`, `bind`, `block_size`, and `devices`.
Devices given on the command line replace devices of the same unit in the file.";
const NAME_LONG_HELP: &str = "name as the computer would send it, percent escapes such as `%A0` are decoded,
and a unit prefix such as `9/` selects the unit when `--unit` is omitted";

fn device_arg() -> Arg {
    Arg::new("device").short('d').long("device").value_name("UNIT:KIND:PATH")
        .help("mount a device, may be repeated")
        .long_help(DEV_HELP)
        .action(ArgAction::Append)
        .required(false)
}

fn config_arg() -> Arg {
    Arg::new("config").short('c').long("config").value_name("PATH")
        .help("configuration file")
        .long_help(CONFIG_LONG_HELP)
        .value_hint(ValueHint::FilePath)
        .required(false)
}

fn unit_arg() -> Arg {
    Arg::new("unit").short('u').long("unit").value_name("UNIT")
        .help("drive unit number")
        .value_parser(value_parser!(u16))
        .required(false)
}

pub fn build_cli() -> Command {
    let long_help = "c64iecd is always invoked with exactly one of several subcommands.
The `serve` subcommand runs the drive server, the others inspect the same devices locally.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
serve the default units: `c64iecd serve`
serve a disk image:      `c64iecd serve -d 8:dir:./store -d 9:d64:games.d64`
list a disk image:       `c64iecd catalog -u 9 -d 9:d64:games.d64`
extract a program:       `c64iecd get -f 9/GAME -d 9:d64:games.d64 > game.prg`";

    let mut main_cmd = Command::new("c64iecd")
        .about("Networked virtual disk drive for the C64.")
        .after_long_help(long_help)
        .version(crate_version!())
        .subcommand_required(true);
    main_cmd = main_cmd.subcommand(
        Command::new("serve")
            .arg(Arg::new("port").short('p').long("port").value_name("PORT")
                .help("UDP port to listen on")
                .value_parser(value_parser!(u16))
                .required(false))
            .arg(Arg::new("bind").short('b').long("bind").value_name("ADDR")
                .help("address to bind")
                .required(false))
            .arg(device_arg())
            .arg(config_arg())
            .about("serve drive units over the network")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("catalog")
            .arg(unit_arg())
            .arg(device_arg())
            .arg(config_arg())
            .visible_alias("dir")
            .visible_alias("ls")
            .about("write the directory listing of a unit to stdout")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("get")
            .arg(Arg::new("file").short('f').long("file").value_name("NAME")
                .help("name of the file on the unit")
                .long_help(NAME_LONG_HELP)
                .required(true))
            .arg(unit_arg())
            .arg(device_arg())
            .arg(config_arg())
            .about("write a file from a unit to stdout")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(Arg::new("shell").short('s').long("shell").value_name("SHELL")
                .help("shell to generate completions for")
                .value_parser(["bash","elv","fish","ps1","zsh"])
                .required(true))
            .about("write shell completions to stdout")
    );
    main_cmd
}

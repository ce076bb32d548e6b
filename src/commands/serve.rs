use log::info;
use crate::net::server::Server;
use crate::STDRESULT;

pub fn serve(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut config = super::config_from_matches(cmd)?;
    if let Some(port) = cmd.get_one::<u16>("port") {
        config.port = *port;
    }
    if let Some(bind) = cmd.get_one::<String>("bind") {
        config.bind = bind.to_string();
    }
    for dev in &config.devices {
        info!("unit {}: {} {}{}",dev.unit,dev.kind,dev.path.display(),match dev.read_only { true => " (read only)", false => "" });
    }
    let mut server = Server::bind(config.server_config(),config.registry())?;
    server.run()
}

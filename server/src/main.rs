use codetrack_server_lib::err_main;
use log::error;

fn main() {
  match err_main() {
    Err(e) => error!("error: {:?}", e),
    Ok(_) => (),
  }
}

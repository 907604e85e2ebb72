pub mod collection;
pub mod config;
pub mod error;
pub mod feed;
pub mod guard;
mod migrations;
pub mod sqldata;
pub mod state;
pub mod sync;
mod synctest;
use crate::{error as zkerr, state::State};
use actix_cors::Cors;
use actix_web::{dev::Server, web, App, HttpResponse, HttpServer};
use clap::Arg;
use collection::Collection;
use config::Config;
use guard::AuthContext;
use log::{error, info};
pub use rusqlite;
use std::error::Error;
use std::fs::File;
use std::io::{stdin, Read, Write};
use std::path::{Path, PathBuf};
use sync::SyncResult;
use tracing_actix_web::TracingLogger;
use trackauth::data::{Login, PublicUser, RegistrationData};
use trackauth::error::MISSING_CREDENTIALS;
pub use trackprotocol;
use trackprotocol::content::{Note, Problem};
use trackprotocol::messages::{LoginReply, MessageReply, RegisterReply};
use trackprotocol::sync_data::SyncPayload;

async fn list_items<T: Collection + 'static>(
  data: web::Data<State>,
  ac: AuthContext,
) -> Result<HttpResponse, zkerr::Error> {
  info!("list {} for {}", T::PLURAL, ac.user_id);
  let conn = sqldata::connection_open(data.config.db.as_path())?;
  let items: Vec<T> = sync::list(&conn, &ac)?;
  Ok(HttpResponse::Ok().json(items))
}

async fn sync_items<T: Collection + 'static>(
  data: web::Data<State>,
  ac: AuthContext,
  body: web::Bytes,
) -> Result<HttpResponse, zkerr::Error> {
  let payload = SyncPayload::<T::Data>::from_slice(&body)?;
  info!(
    "sync {} for {}: {}",
    T::PLURAL,
    ac.user_id,
    match &payload {
      SyncPayload::List(items) => format!("list of {}", items.len()),
      SyncPayload::Single(_) => "single".to_string(),
    }
  );

  let mut conn = sqldata::connection_open(data.config.db.as_path())?;

  match sync::sync_or_upsert::<T>(&mut conn, &ac, &payload)? {
    SyncResult::Replaced(_) => Ok(HttpResponse::Ok().json(MessageReply::new(
      format!("{}s list synced successfully", T::LABEL).as_str(),
    ))),
    SyncResult::Updated(item) => Ok(
      HttpResponse::Ok().json(entity_reply(
        format!("{} updated successfully", T::LABEL),
        T::ENTITY_KEY,
        &item,
      )?),
    ),
    SyncResult::Created(item) => Ok(
      HttpResponse::Created().json(entity_reply(
        format!("{} added successfully", T::LABEL),
        T::ENTITY_KEY,
        &item,
      )?),
    ),
  }
}

// {"message": .., "problem": {..}}
fn entity_reply<T: serde::Serialize>(
  message: String,
  key: &str,
  item: &T,
) -> Result<serde_json::Value, zkerr::Error> {
  let mut reply = serde_json::Map::new();
  reply.insert("message".to_string(), serde_json::Value::String(message));
  reply.insert(key.to_string(), serde_json::to_value(item)?);
  Ok(serde_json::Value::Object(reply))
}

async fn delete_item<T: Collection + 'static>(
  data: web::Data<State>,
  ac: AuthContext,
  path: web::Path<String>,
) -> Result<HttpResponse, zkerr::Error> {
  let id = path.into_inner();
  let conn = sqldata::connection_open(data.config.db.as_path())?;
  if sync::delete_scoped::<T>(&conn, &ac, id.as_str())? {
    Ok(HttpResponse::Ok().json(MessageReply::new(
      format!("{} with ID {} deleted successfully", T::LABEL, id).as_str(),
    )))
  } else {
    Err(zkerr::Error::NotFound(format!(
      "{} not found or unauthorized",
      T::LABEL
    )))
  }
}

async fn register(data: web::Data<State>, body: web::Bytes) -> Result<HttpResponse, zkerr::Error> {
  let rd: RegistrationData = serde_json::from_slice(&body)
    .map_err(|_| zkerr::Error::Validation(MISSING_CREDENTIALS.to_string()))?;
  info!("register: {}", rd.username);

  let conn = sqldata::connection_open(data.config.db.as_path())?;
  let user = trackauth::dbfun::new_user(&conn, &rd)?;

  Ok(HttpResponse::Created().json(RegisterReply {
    message: "User registered successfully".to_string(),
    user: PublicUser::from(&user),
  }))
}

async fn login(data: web::Data<State>, body: web::Bytes) -> Result<HttpResponse, zkerr::Error> {
  let login: Login = serde_json::from_slice(&body)
    .map_err(|_| zkerr::Error::Validation(MISSING_CREDENTIALS.to_string()))?;
  info!("login: {}", login.username);

  let conn = sqldata::connection_open(data.config.db.as_path())?;
  let user = trackauth::dbfun::login(&conn, &login)?;

  Ok(HttpResponse::Ok().json(LoginReply {
    message: "Login successful".to_string(),
    user_id: user.id,
    username: user.name,
  }))
}

async fn public_problems(data: web::Data<State>) -> Result<HttpResponse, zkerr::Error> {
  let conn = sqldata::connection_open(data.config.db.as_path())?;
  let feed = feed::list_public_feed(&conn)?;
  info!("public feed: {} problems", feed.len());
  Ok(HttpResponse::Ok().json(feed))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
  cfg
    .service(
      web::resource("/problems")
        .route(web::get().to(list_items::<Problem>))
        .route(web::post().to(sync_items::<Problem>)),
    )
    .service(web::resource("/problems/{id}").route(web::delete().to(delete_item::<Problem>)))
    .service(
      web::resource("/notes")
        .route(web::get().to(list_items::<Note>))
        .route(web::post().to(sync_items::<Note>)),
    )
    .service(web::resource("/notes/{id}").route(web::delete().to(delete_item::<Note>)))
    .service(web::resource("/register").route(web::post().to(register)))
    .service(web::resource("/login").route(web::post().to(login)))
    .service(web::resource("/public_problems").route(web::get().to(public_problems)));
}

pub fn defcon() -> Config {
  Config {
    ip: "127.0.0.1".to_string(),
    port: 5001,
    db: PathBuf::from("./site.db"),
    mainsite: "http://127.0.0.1:5500".to_string(),
    altmainsite: [].to_vec(),
  }
}

pub fn load_string(file_name: &str) -> Result<String, zkerr::Error> {
  let path = &Path::new(&file_name);
  let mut inf = File::open(path)?;
  let mut result = String::new();
  inf.read_to_string(&mut result)?;
  Ok(result)
}

pub fn write_string(file_name: &str, text: &str) -> Result<usize, zkerr::Error> {
  let path = &Path::new(&file_name);
  let mut outf = File::create(path)?;
  Ok(outf.write(text.as_bytes())?)
}

pub fn load_config(filename: &str) -> Result<Config, zkerr::Error> {
  info!("loading config: {}", filename);
  let text = load_string(filename).map_err(|e| {
    zkerr::annotate_string(format!("failed to load config: '{}'", filename), e)
  })?;
  Ok(toml::from_str(text.as_str())?)
}

pub fn write_config(filename: &str, config: &Config) -> Result<(), zkerr::Error> {
  write_string(filename, toml::to_string_pretty(config)?.as_str())?;
  Ok(())
}

fn init_logging(logfile: Option<&str>) -> Result<(), Box<dyn Error>> {
  match logfile {
    Some(lf) => {
      let target = Box::new(File::create(lf)?);
      env_logger::Builder::new()
        .target(env_logger::Target::Pipe(target))
        .filter(None, log::LevelFilter::Debug)
        .init();
    }
    None => env_logger::init(),
  };
  Ok(())
}

#[actix_web::main]
pub async fn err_main() -> Result<(), Box<dyn Error>> {
  let matches = clap::App::new("codetrack server")
    .version("1.0")
    .about("problem and note tracker web server")
    .arg(
      Arg::with_name("export")
        .short("e")
        .long("export")
        .value_name("FILE")
        .help("Export database to json")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("config")
        .short("c")
        .long("config")
        .value_name("FILE")
        .help("specify config file")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("write_config")
        .short("w")
        .long("write_config")
        .value_name("FILE")
        .help("write default config file")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("create_user")
        .short("u")
        .long("create_user")
        .value_name("user name")
        .help("create new user")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("logfile")
        .short("l")
        .long("logfile")
        .value_name("FILE")
        .help("write log to file")
        .takes_value(true),
    )
    .get_matches();

  init_logging(matches.value_of("logfile"))?;

  // writing a config file?
  if let Some(filename) = matches.value_of("write_config") {
    write_config(filename, &defcon())?;
    info!("default config written to file: {}", filename);
    return Ok(());
  }

  // specifying a config file?  otherwise try to load the default.
  let mut config = match matches.value_of("config") {
    Some(filename) => load_config(filename)?,
    None => {
      if Path::new("config.toml").exists() {
        load_config("config.toml")?
      } else {
        info!("no config.toml, using defaults");
        defcon()
      }
    }
  };

  config::apply_env(&mut config)?;

  sqldata::dbinit(config.db.as_path())?;

  // are we exporting the DB?
  if let Some(exportfile) = matches.value_of("export") {
    let conn = sqldata::connection_open(config.db.as_path())?;
    write_string(
      exportfile,
      serde_json::to_string_pretty(&sqldata::export_db(&conn)?)?.as_str(),
    )?;
    info!("database exported to: {}", exportfile);
    return Ok(());
  }

  // creating a user?
  if let Some(username) = matches.value_of("create_user") {
    // prompt for password.
    println!("Enter password for user '{}':", username);
    let mut pwd = String::new();
    stdin().read_line(&mut pwd)?;

    let conn = sqldata::connection_open(config.db.as_path())?;
    let user = trackauth::dbfun::new_user(
      &conn,
      &RegistrationData {
        username: username.to_string(),
        password: pwd.trim().to_string(),
      },
    )
    .map_err(zkerr::Error::from)?;

    println!("user created: {} id: {}", user.name, user.id);
    return Ok(());
  }

  // Web server is the default.
  let server = init_server(config).await?;
  server.await?;

  Ok(())
}

pub async fn init_server(config: Config) -> Result<Server, Box<dyn Error>> {
  info!("server init!");

  info!("config parameters:\n\n{}", toml::to_string_pretty(&config)?);

  sqldata::dbinit(config.db.as_path())?;

  // create here, not in the HttpServer::new() call, so all workers share it.
  let state = web::Data::new(State {
    config: config.clone(),
  });

  let c = config.clone();
  let server = HttpServer::new(move || {
    let d = c.clone();
    let cors = Cors::default()
      .allowed_origin_fn(move |rv, rh| {
        if *rv == d.mainsite || d.altmainsite.iter().any(|am| *rv == am) {
          true
        } else {
          info!("cors denied: {:?}, {:?}", rv, rh);
          false
        }
      })
      .allow_any_header()
      .allow_any_method()
      .max_age(3600);

    App::new()
      .app_data(state.clone())
      .app_data(web::PayloadConfig::new(16 * 1024 * 1024))
      .wrap(cors)
      .wrap(TracingLogger::default())
      .configure(routes)
  })
  .bind(format!("{}:{}", config.ip, config.port))
  .map_err(|e| {
    error!("bind failed on {}:{}: {}", config.ip, config.port, e);
    e
  })?
  .run();

  Ok(server)
}

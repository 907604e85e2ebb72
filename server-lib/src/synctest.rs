#[cfg(test)]
mod tests {
  use crate::config::Config;
  use crate::guard::USER_ID_HEADER;
  use crate::sqldata;
  use crate::state::State;
  use crate::{defcon, routes};
  use actix_web::http::StatusCode;
  use actix_web::{test, web, App};
  use serde_json::{json, Value};
  use tempfile::TempDir;

  fn test_config() -> (TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = defcon();
    config.db = dir.path().join("test.db");
    sqldata::dbinit(config.db.as_path()).unwrap();
    (dir, config)
  }

  fn with_user(req: test::TestRequest, uid: Option<&str>) -> test::TestRequest {
    match uid {
      Some(uid) => req.insert_header((USER_ID_HEADER, uid)),
      None => req,
    }
  }

  // (status, json body) for a request against the test service.
  macro_rules! send {
    ($app:expr, $req:expr) => {{
      let resp = test::call_service($app, $req.to_request()).await;
      let status = resp.status();
      let body: Value = test::read_body_json(resp).await;
      (status, body)
    }};
  }

  macro_rules! post {
    ($app:expr, $path:expr, $uid:expr, $body:expr $(,)?) => {
      send!($app, with_user(test::TestRequest::post().uri($path).set_json($body), $uid))
    };
  }

  macro_rules! get {
    ($app:expr, $path:expr, $uid:expr $(,)?) => {
      send!($app, with_user(test::TestRequest::get().uri($path), $uid))
    };
  }

  macro_rules! delete {
    ($app:expr, $path:expr, $uid:expr $(,)?) => {
      send!($app, with_user(test::TestRequest::delete().uri($path), $uid))
    };
  }

  // registers then logs in, returning the user id.
  macro_rules! register_and_login {
    ($app:expr, $username:expr, $password:expr $(,)?) => {{
      let (status, reg) = post!(
        $app,
        "/register",
        None,
        json!({"username": $username, "password": $password})
      );
      assert_eq!(status, StatusCode::CREATED);
      assert_eq!(reg["message"], json!("User registered successfully"));
      assert_eq!(reg["user"]["username"], json!($username));
      assert!(reg["user"].get("hashwd").is_none());

      let (status, li) = post!(
        $app,
        "/login",
        None,
        json!({"username": $username, "password": $password})
      );
      assert_eq!(status, StatusCode::OK);
      assert_eq!(li["message"], json!("Login successful"));
      assert_eq!(li["userId"], reg["user"]["id"]);
      li["userId"].as_str().unwrap().to_string()
    }};
  }

  #[actix_web::test]
  async fn test_problem_lifecycle() {
    let (_dir, config) = test_config();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(State { config }))
        .configure(routes),
    )
    .await;

    let uid = register_and_login!(&app, "alice", "pw1");

    let (status, added) = post!(
      &app,
      "/problems",
      Some(uid.as_str()),
      json!({"name": "Two Sum", "topic": "Arrays", "difficulty": "Easy", "addedDate": "2024-01-01"}),
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["message"], json!("Problem added successfully"));
    assert_eq!(added["problem"]["userId"], json!(uid));
    assert_eq!(added["problem"]["solved"], json!(false));
    let pid = added["problem"]["id"].as_str().unwrap().to_string();
    assert!(!pid.is_empty());

    let (status, listed) = get!(&app, "/problems", Some(uid.as_str()));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], json!(pid));
    assert_eq!(listed[0]["name"], json!("Two Sum"));

    let (status, updated) = post!(
      &app,
      "/problems",
      Some(uid.as_str()),
      json!({"id": pid, "solved": true}),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], json!("Problem updated successfully"));
    assert_eq!(updated["problem"]["solved"], json!(true));
    assert_eq!(updated["problem"]["name"], json!("Two Sum"));

    let (status, deleted) = delete!(&app, format!("/problems/{}", pid).as_str(), Some(uid.as_str()));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      deleted["message"],
      json!(format!("Problem with ID {} deleted successfully", pid))
    );

    let (status, listed) = get!(&app, "/problems", Some(uid.as_str()));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    let (status, gone) = delete!(&app, format!("/problems/{}", pid).as_str(), Some(uid.as_str()));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(gone["message"], json!("Problem not found or unauthorized"));
  }

  #[actix_web::test]
  async fn test_requires_identity() {
    let (_dir, config) = test_config();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(State { config }))
        .configure(routes),
    )
    .await;

    for path in ["/problems", "/notes"].iter() {
      let (status, body) = get!(&app, path, None);
      assert_eq!(status, StatusCode::UNAUTHORIZED);
      assert_eq!(body["message"], json!("Authentication required"));

      let (status, _) = post!(&app, path, None, json!({"name": "x"}));
      assert_eq!(status, StatusCode::UNAUTHORIZED);

      let (status, _) = delete!(&app, format!("{}/some-id", path).as_str(), None);
      assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
  }

  #[actix_web::test]
  async fn test_bad_sync_bodies() {
    let (_dir, config) = test_config();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(State { config }))
        .configure(routes),
    )
    .await;

    for body in vec![json!(null), json!([]), json!({})] {
      let (status, reply) = post!(&app, "/problems", Some("u1"), body);
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert_eq!(reply["message"], json!("No data provided"));
    }

    let (status, _) = post!(&app, "/notes", Some("u1"), json!("just a string"));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // a list element that can't be built fails the whole sync.
    let (status, reply) = post!(
      &app,
      "/notes",
      Some("u1"),
      json!([{"userId": "u1", "topic": "no title", "addedDate": "2024-01-01"}]),
    );
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(reply["message"]
      .as_str()
      .unwrap()
      .starts_with("Error syncing notes: "));
  }

  #[actix_web::test]
  async fn test_notes_list_sync() {
    let (_dir, config) = test_config();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(State { config }))
        .configure(routes),
    )
    .await;

    let (status, _) = post!(
      &app,
      "/notes",
      Some("u1"),
      json!({"id": "stale", "title": "old", "topic": "t", "addedDate": "2024-01-01"}),
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, reply) = post!(
      &app,
      "/notes",
      Some("u1"),
      json!([
        {"id": "n1", "title": "one", "topic": "t", "addedDate": "2024-01-01", "userId": "u1"},
        {"id": "n2", "title": "two", "topic": "t", "addedDate": "2024-01-02", "userId": "u1"},
        {"id": "n3", "title": "forged", "topic": "t", "addedDate": "2024-01-03", "userId": "u2"}
      ]),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["message"], json!("Notes list synced successfully"));

    let (_, listed) = get!(&app, "/notes", Some("u1"));
    let mut ids: Vec<String> = listed
      .as_array()
      .unwrap()
      .iter()
      .map(|n| n["id"].as_str().unwrap().to_string())
      .collect();
    ids.sort();
    assert_eq!(ids, vec!["n1".to_string(), "n2".to_string()]);

    let (_, other) = get!(&app, "/notes", Some("u2"));
    assert_eq!(other, json!([]));
  }

  #[actix_web::test]
  async fn test_register_and_login_errors() {
    let (_dir, config) = test_config();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(State { config }))
        .configure(routes),
    )
    .await;

    register_and_login!(&app, "alice", "pw1");

    let (status, reply) = post!(
      &app,
      "/register",
      None,
      json!({"username": "alice", "password": "again"}),
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(reply["message"], json!("Username already exists"));

    let (status, reply) = post!(&app, "/register", None, json!({"username": "bob"}));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["message"], json!("Username and password are required"));

    let (status, _) = post!(&app, "/login", None, json!({"password": "pw1"}));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (s1, wrongpwd) = post!(
      &app,
      "/login",
      None,
      json!({"username": "alice", "password": "nope"}),
    );
    let (s2, nouser) = post!(
      &app,
      "/login",
      None,
      json!({"username": "nobody", "password": "pw1"}),
    );
    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(wrongpwd, nouser);
    assert_eq!(wrongpwd["message"], json!("Invalid username or password"));
  }

  #[actix_web::test]
  async fn test_public_problems() {
    let (_dir, config) = test_config();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(State { config }))
        .configure(routes),
    )
    .await;

    let alice = register_and_login!(&app, "alice", "pw1");
    let bob = register_and_login!(&app, "bob", "pw2");

    for (uid, name) in vec![(&alice, "alice's problem"), (&bob, "bob's problem")] {
      let (status, _) = post!(
      &app,
        "/problems",
        Some(uid.as_str()),
        json!({"name": name, "topic": "Graphs", "difficulty": "Hard", "addedDate": "2024-01-01", "isPublic": false}),
      );
      assert_eq!(status, StatusCode::CREATED);
    }

    let (status, feed) = get!(&app, "/public_problems", None);
    assert_eq!(status, StatusCode::OK);
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 2);
    for entry in feed.iter() {
      if entry["userId"] == json!(alice) {
        assert_eq!(entry["username"], json!("alice"));
        assert_eq!(entry["name"], json!("alice's problem"));
      } else {
        assert_eq!(entry["userId"], json!(bob));
        assert_eq!(entry["username"], json!("bob"));
      }
    }
  }
}

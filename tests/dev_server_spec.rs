use axum::http::StatusCode;
use axum_test::TestServer;
use media_manifest::scan::ScanSettings;
use media_manifest::server::{AppState, create_router};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "fake image").unwrap();
}

fn write_png(root: &Path, rel: &str, width: u32, height: u32) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::new(width, height)
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
}

fn write_gif(root: &Path, rel: &str, width: u16, height: u16) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut bytes = b"GIF89a".to_vec();
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x3B]);
    fs::write(path, bytes).unwrap();
}

/// A public dir with a projects tree covering all three categories.
fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let projects = tmp.path().join("public/projects");

    write_gif(&projects, "alpha/collage/1.gif", 40, 20);
    write_png(&projects, "alpha/collage/1.png", 10, 10);
    write_png(&projects, "alpha/collage/10.png", 200, 100);
    write_png(&projects, "alpha/collage/2.png", 100, 600);
    touch(&projects, "alpha/approach/01.mp4");
    touch(&projects, "alpha/approach/01.png");
    touch(&projects, "alpha/approach/02.webp");
    touch(&projects, "beta/prototypes/sketch.jpg");
    touch(&projects, "beta/prototypes/notes.txt");

    fs::write(tmp.path().join("public/index.html"), "<h1>portfolio</h1>").unwrap();
    tmp
}

fn setup(tmp: &TempDir, use_cache: bool) -> TestServer {
    let state = AppState::new(
        tmp.path().join("public/projects"),
        ScanSettings::default(),
        use_cache,
    );
    let app = create_router(state, Some(tmp.path().join("public")));
    TestServer::new(app).expect("Failed to create test server")
}

fn setup_with_root(root: PathBuf) -> TestServer {
    let state = AppState::new(root, ScanSettings::default(), true);
    TestServer::new(create_router(state, None)).expect("Failed to create test server")
}

mod manifest_endpoints {
    use super::*;

    #[tokio::test]
    async fn collage_reports_layout_dimensions() {
        let tmp = fixture();
        let server = setup(&tmp, true);

        let response = server.get("/__dev-collage-manifest").await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "alpha": [
                    { "id": "1", "width": 600, "height": 300, "src": "/projects/alpha/collage/1.gif" },
                    { "id": "2", "width": 50, "height": 300, "src": "/projects/alpha/collage/2.png" },
                    { "id": "10", "width": 200, "height": 100, "src": "/projects/alpha/collage/10.png" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn approach_prefers_video_and_reports_type() {
        let tmp = fixture();
        let server = setup(&tmp, true);

        let response = server.get("/__dev-approach-manifest").await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "alpha": [
                    { "id": "01", "type": "video", "src": "/projects/alpha/approach/01.mp4" },
                    { "id": "02", "type": "image", "src": "/projects/alpha/approach/02.webp" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn prototype_lists_paths_only() {
        let tmp = fixture();
        let server = setup(&tmp, true);

        let response = server.get("/__dev-prototype-manifest").await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "beta": [ { "id": "sketch", "src": "/projects/beta/prototypes/sketch.jpg" } ]
            })
        );
    }

    #[tokio::test]
    async fn responses_are_json_and_never_cached() {
        let tmp = fixture();
        let server = setup(&tmp, true);

        for endpoint in [
            "/__dev-collage-manifest",
            "/__dev-approach-manifest",
            "/__dev-prototype-manifest",
        ] {
            let response = server.get(endpoint).await;
            response.assert_status_ok();
            assert_eq!(response.header("cache-control"), "no-store");
            assert_eq!(response.header("content-type"), "application/json");
        }
    }

    #[tokio::test]
    async fn endpoint_matches_under_base_path() {
        let tmp = fixture();
        let server = setup(&tmp, true);

        let bare = server.get("/__dev-prototype-manifest").await.json::<Value>();
        let nested = server
            .get("/portfolio/__dev-prototype-manifest")
            .await;

        nested.assert_status_ok();
        assert_eq!(nested.json::<Value>(), bare);
    }

    #[tokio::test]
    async fn query_string_is_ignored() {
        let tmp = fixture();
        let server = setup(&tmp, true);

        let response = server.get("/__dev-prototype-manifest?t=12345").await;

        response.assert_status_ok();
        assert!(response.json::<Value>().get("beta").is_some());
    }

    #[tokio::test]
    async fn empty_root_returns_empty_object() {
        let tmp = TempDir::new().unwrap();
        let server = setup_with_root(tmp.path().to_path_buf());

        let response = server.get("/__dev-collage-manifest").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({}));
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn missing_root_returns_500_with_error_body() {
        let tmp = TempDir::new().unwrap();
        let server = setup_with_root(tmp.path().join("missing"));

        let response = server.get("/__dev-collage-manifest").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Failed to build dev collage manifest." })
        );
    }

    #[tokio::test]
    async fn root_that_is_a_file_returns_500() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("projects");
        fs::write(&file, "not a directory").unwrap();
        let server = setup_with_root(file);

        let response = server.get("/__dev-approach-manifest").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Failed to build dev approach manifest." })
        );
    }

    #[tokio::test]
    async fn corrupt_collage_image_is_skipped() {
        let tmp = fixture();
        touch(&tmp.path().join("public/projects"), "alpha/collage/3.jpg");
        let server = setup(&tmp, true);

        let response = server.get("/__dev-collage-manifest").await;

        response.assert_status_ok();
        let ids: Vec<String> = response.json::<Value>()["alpha"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "10"]);
    }
}

mod freshness {
    use super::*;

    #[tokio::test]
    async fn new_file_appears_on_next_request() {
        let tmp = fixture();
        let server = setup(&tmp, true);

        let before = server.get("/__dev-prototype-manifest").await.json::<Value>();
        assert_eq!(before["beta"].as_array().unwrap().len(), 1);

        touch(&tmp.path().join("public/projects"), "beta/prototypes/wireframe.png");
        let after = server.get("/__dev-prototype-manifest").await.json::<Value>();
        assert_eq!(
            after["beta"],
            json!([
                { "id": "sketch", "src": "/projects/beta/prototypes/sketch.jpg" },
                { "id": "wireframe", "src": "/projects/beta/prototypes/wireframe.png" }
            ])
        );
    }

    #[tokio::test]
    async fn removed_project_disappears_without_cache() {
        let tmp = fixture();
        let server = setup(&tmp, false);

        server
            .get("/__dev-prototype-manifest")
            .await
            .assert_status_ok();

        fs::remove_dir_all(tmp.path().join("public/projects/beta")).unwrap();
        let response = server.get("/__dev-prototype-manifest").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({}));
    }
}

mod static_files {
    use super::*;

    #[tokio::test]
    async fn other_paths_serve_public_dir() {
        let tmp = fixture();
        let server = setup(&tmp, true);

        let response = server.get("/index.html").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "<h1>portfolio</h1>");
    }

    #[tokio::test]
    async fn project_media_is_served_as_is() {
        let tmp = fixture();
        let server = setup(&tmp, true);

        let response = server.get("/projects/alpha/approach/01.mp4").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "fake image");
    }

    #[tokio::test]
    async fn endpoint_lookalike_is_not_a_manifest() {
        let tmp = TempDir::new().unwrap();
        let server = setup_with_root(tmp.path().to_path_buf());

        server
            .get("/x__dev-collage-manifest")
            .await
            .assert_status_not_found();
    }
}

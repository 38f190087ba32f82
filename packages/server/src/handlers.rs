//! HTTP handler functions for the ward lookup API.

use actix_web::{
    HttpResponse,
    http::header::{CACHE_CONTROL, ContentType},
    web,
};
use civic_map_server_models::{
    ApiError, ApiHealth, ApiReportLocation, LocateRequest, ReportLocationQuery,
};

use crate::AppState;

/// The boundary files only change with a redeploy.
const DATASET_CACHE_CONTROL: &str = "public, max-age=86400, immutable";

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        wards: state.locator.ward_count(),
    })
}

/// `POST /api/geo/locate`
///
/// Resolves `{ lat, lng }` to the ward containing it.
pub async fn locate(state: web::Data<AppState>, body: web::Json<LocateRequest>) -> HttpResponse {
    match state.locator.locate_ward(body.lat, body.lng) {
        Ok(Some(ward)) => HttpResponse::Ok().json(ward),
        Ok(None) => HttpResponse::NotFound().json(ApiError::new("Not found in any ward")),
        Err(e) => HttpResponse::BadRequest().json(ApiError::new(e.to_string())),
    }
}

/// `GET /api/geo/ward-zones`
pub async fn ward_zones(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .insert_header((CACHE_CONTROL, DATASET_CACHE_CONTROL))
        .body(state.ward_zones.clone())
}

/// `GET /api/geo/divisions`
pub async fn divisions(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/geo+json")
        .insert_header((CACHE_CONTROL, DATASET_CACHE_CONTROL))
        .body(state.divisions.clone())
}

/// `POST /api/reports/location`
///
/// The request body is the report photo, if any. `lat`/`lng` query
/// parameters are used when the photo has no GPS position.
pub async fn report_location(
    state: web::Data<AppState>,
    query: web::Query<ReportLocationQuery>,
    body: web::Bytes,
) -> HttpResponse {
    let photo = (!body.is_empty()).then_some(&body[..]);

    match state
        .locator
        .locate_report(photo, query.lat.as_deref(), query.lng.as_deref())
    {
        Ok(location) => HttpResponse::Ok().json(ApiReportLocation {
            latitude: location.coordinate.latitude,
            longitude: location.coordinate.longitude,
            source: location.source,
            ward: location.ward,
        }),
        Err(e) => {
            log::debug!("Report location rejected: {e}");
            HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{
        App,
        http::{StatusCode, header::CACHE_CONTROL},
        test, web,
    };
    use civic_map_exif::test_utils::{tiff_with_gps, tiff_without_gps};
    use civic_map_locator::WardLocator;
    use civic_map_spatial::DatasetSources;
    use civic_map_ward_models::DatasetConfig;
    use serde_json::{Value, json};

    use crate::{AppState, MAX_PHOTO_BYTES, configure};

    const WARDS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "Name": "1", "Zone": "I" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "Name": "2", "Zone": "I" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[1, 0], [1, 1], [2, 1], [2, 0], [1, 0]]]
                }
            }
        ]
    }"#;

    const ZONES: &str = r#"["Kathivakkam", "Ennore"]"#;

    fn state() -> web::Data<AppState> {
        let sources = DatasetSources {
            boundaries: WARDS.to_string(),
            zones: ZONES.to_string(),
        };
        let locator = WardLocator::from_sources(&sources, &DatasetConfig::default()).unwrap();
        web::Data::new(AppState::new(locator, sources))
    }

    #[actix_web::test]
    async fn health_reports_ward_count() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["healthy"], true);
        assert_eq!(body["wards"], 2);
    }

    #[actix_web::test]
    async fn locate_returns_ward_info() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/geo/locate")
            .set_json(json!({ "lat": 0.5, "lng": 1.5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({ "wardNumber": 2, "wardName": "Ennore", "Name": "2", "Zone": "I" })
        );
    }

    #[actix_web::test]
    async fn locate_outside_every_ward_is_not_found() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/geo/locate")
            .set_json(json!({ "lat": 10.0, "lng": 10.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Not found in any ward" }));
    }

    #[actix_web::test]
    async fn locate_rejects_non_numeric_body() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/geo/locate")
            .set_json(json!({ "lat": "north", "lng": 1.5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "lat and lng must be numbers" }));
    }

    #[actix_web::test]
    async fn locate_rejects_out_of_range_latitude() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/geo/locate")
            .set_json(json!({ "lat": 95.0, "lng": 1.5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("latitude"), "unexpected message: {message}");
    }

    #[actix_web::test]
    async fn dataset_routes_serve_sources_with_cache_headers() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/geo/ward-zones").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(CACHE_CONTROL).unwrap(),
            "public, max-age=86400, immutable"
        );
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], ZONES.as_bytes());

        let req = test::TestRequest::get().uri("/api/geo/divisions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/geo+json"
        );
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], WARDS.as_bytes());
    }

    #[actix_web::test]
    async fn report_location_prefers_photo_gps() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let photo = tiff_with_gps([(0, 1), (30, 1), (0, 1)], b'N', [(1, 1), (30, 1), (0, 1)], b'E');
        let req = test::TestRequest::post()
            .uri("/api/reports/location?lat=0.5&lng=0.5")
            .set_payload(photo)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["source"], "exif");
        assert_eq!(body["ward"]["wardNumber"], 2);
        assert!((body["latitude"].as_f64().unwrap() - 0.5).abs() < 1e-9);
        assert!((body["longitude"].as_f64().unwrap() - 1.5).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn report_location_falls_back_to_query() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/reports/location?lat=0.5&lng=0.25")
            .set_payload(tiff_without_gps())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["source"], "provided");
        assert_eq!(body["ward"]["wardNumber"], 1);
        assert_eq!(body["ward"]["wardName"], "Kathivakkam");
    }

    #[actix_web::test]
    async fn report_location_without_any_position_is_rejected() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/reports/location")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({ "error": "Invalid or missing location information" })
        );
    }

    #[actix_web::test]
    async fn report_location_rejects_oversized_photo() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/reports/location?lat=0.5&lng=0.5")
            .set_payload(vec![0_u8; MAX_PHOTO_BYTES + 1])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[actix_web::test]
    async fn report_location_outside_service_area_is_rejected() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/reports/location?lat=45&lng=45")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Location outside supported area" }));
    }
}

mod common;

use cinema_client::controllers::seat_booking::SEATS_TAKEN;
use cinema_client::controllers::{BookingOutcome, BookingPhase, SeatBookingPage, SeatState};
use cinema_client::routes::Route;
use cinema_client::ClientError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

async fn mount_screening(server: &MockServer, seats: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/screenings/41/seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seats))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/screenings/41"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(screening(41, 3, "2030-05-01T18:00:00Z", 10.0)),
        )
        .mount(server)
        .await;
}

fn two_seats() -> serde_json::Value {
    json!([seat(1, "A", 1, false), seat(2, "A", 2, true)])
}

#[tokio::test]
async fn taken_seat_cannot_be_selected() {
    let server = MockServer::start().await;
    mount_screening(&server, two_seats()).await;
    let ctx = anonymous(&server);

    let mut page = SeatBookingPage::new(ctx, 3, Some(41));
    page.load().await.unwrap();

    assert!(page.toggle_seat(1));
    assert_eq!(page.selection().ids(), [1]);
    assert_eq!(page.total(), 10.0);

    assert!(!page.toggle_seat(2));
    assert_eq!(page.selection().ids(), [1]);
    assert_eq!(page.total(), 10.0);

    let grid = page.grid();
    assert_eq!(grid.columns, 2);
    let cells = &grid.rows[0].cells;
    assert_eq!(cells[0].as_ref().unwrap().state, SeatState::Selected);
    assert_eq!(cells[1].as_ref().unwrap().state, SeatState::Taken);

    assert!(page.toggle_seat(1));
    assert!(page.selection().is_empty());
    assert!(!page.can_submit());
}

#[tokio::test]
async fn conflict_clears_selection_and_refetches_seats() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/screenings/41/seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_seats()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // Пока пользователь выбирал, место 1 купил кто-то другой
    Mock::given(method("GET"))
        .and(path("/api/screenings/41/seats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([seat(1, "A", 1, true), seat(2, "A", 2, true)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/screenings/41"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(screening(41, 3, "2030-05-01T18:00:00Z", 10.0)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    let ctx = signed_in(&server, user(7, false));

    let mut page = SeatBookingPage::new(ctx.clone(), 3, Some(41));
    page.load().await.unwrap();
    page.toggle_seat(1);

    let outcome = page.submit_booking().await.unwrap();
    assert_eq!(outcome, BookingOutcome::Conflict);
    assert!(page.selection().is_empty());
    assert_eq!(page.total(), 0.0);
    assert_eq!(page.phase(), BookingPhase::Selecting);

    assert_eq!(count(&server, "GET", "/api/screenings/41/seats").await, 2);
    assert!(messages(&ctx).iter().any(|m| m == SEATS_TAKEN && m.contains("just taken")));

    assert!(page.seats()[0].taken);
    assert!(!page.toggle_seat(1));
    assert!(page.selection().is_empty());
    let grid = page.grid();
    assert_eq!(grid.rows[0].cells[0].as_ref().unwrap().state, SeatState::Taken);
}

#[tokio::test]
async fn successful_booking_navigates_to_history() {
    let server = MockServer::start().await;
    mount_screening(
        &server,
        json!([seat(1, "A", 1, false), seat(2, "A", 2, false), seat(3, "B", 1, false)]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({ "screeningId": 41, "seatIds": [3, 1] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 900,
            "screeningId": 41,
            "totalPrice": 20.0,
            "tickets": [{ "id": 1, "seatId": 3 }, { "id": 2, "seatId": 1 }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let ctx = signed_in(&server, user(7, false));

    let mut page = SeatBookingPage::new(ctx.clone(), 3, Some(41));
    page.load().await.unwrap();
    page.toggle_seat(3);
    page.toggle_seat(1);

    match page.submit_booking().await.unwrap() {
        BookingOutcome::Booked { receipt, navigate } => {
            let receipt = receipt.unwrap();
            assert_eq!(receipt.id, 900);
            assert_eq!(receipt.total_price, 20.0);
            assert_eq!(receipt.tickets.len(), 2);
            assert_eq!(navigate, Route::Bookings);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(page.phase(), BookingPhase::Booked);
    assert!(page.selection().is_empty());
    assert!(ctx.notifier.active().is_empty());
}

#[tokio::test]
async fn empty_created_response_still_navigates() {
    let server = MockServer::start().await;
    mount_screening(&server, two_seats()).await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let ctx = signed_in(&server, user(7, false));

    let mut page = SeatBookingPage::new(ctx.clone(), 3, Some(41));
    page.load().await.unwrap();
    page.toggle_seat(1);

    assert_eq!(
        page.submit_booking().await.unwrap(),
        BookingOutcome::Booked { receipt: None, navigate: Route::Bookings }
    );
    assert_eq!(page.phase(), BookingPhase::Booked);
    assert!(page.selection().is_empty());
    assert!(ctx.notifier.active().is_empty());
}

#[tokio::test]
async fn anonymous_user_is_sent_to_login_without_request() {
    let server = MockServer::start().await;
    mount_screening(&server, two_seats()).await;
    let ctx = anonymous(&server);

    let mut page = SeatBookingPage::new(ctx, 3, Some(41));
    page.load().await.unwrap();
    page.toggle_seat(1);

    let outcome = page.submit_booking().await.unwrap();
    assert_eq!(outcome, BookingOutcome::LoginRequired(Route::Login { session_expired: false }));
    assert_eq!(page.selection().ids(), [1]);
    assert_eq!(count(&server, "POST", "/api/bookings").await, 0);
}

#[tokio::test]
async fn empty_selection_is_not_submitted() {
    let server = MockServer::start().await;
    mount_screening(&server, two_seats()).await;
    let ctx = signed_in(&server, user(7, false));

    let mut page = SeatBookingPage::new(ctx, 3, Some(41));
    page.load().await.unwrap();

    assert_eq!(page.submit_booking().await.unwrap(), BookingOutcome::NothingSelected);
    assert_eq!(count(&server, "POST", "/api/bookings").await, 0);
}

#[tokio::test]
async fn structured_rejection_is_shown_and_selection_kept() {
    let server = MockServer::start().await;
    mount_screening(&server, two_seats()).await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Bad request",
            "detail": "Screening already started"
        })))
        .mount(&server)
        .await;
    let ctx = signed_in(&server, user(7, false));

    let mut page = SeatBookingPage::new(ctx.clone(), 3, Some(41));
    page.load().await.unwrap();
    page.toggle_seat(1);

    assert_eq!(page.submit_booking().await.unwrap(), BookingOutcome::Rejected);
    assert_eq!(page.selection().ids(), [1]);
    let shown = ctx.notifier.active();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title.as_deref(), Some("Bad request"));
    assert_eq!(shown[0].message, "Screening already started");
}

#[tokio::test]
async fn bare_rejection_fails_silently() {
    let server = MockServer::start().await;
    mount_screening(&server, two_seats()).await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let ctx = signed_in(&server, user(7, false));

    let mut page = SeatBookingPage::new(ctx.clone(), 3, Some(41));
    page.load().await.unwrap();
    page.toggle_seat(1);

    assert_eq!(page.submit_booking().await.unwrap(), BookingOutcome::Rejected);
    assert_eq!(page.selection().ids(), [1]);
    assert!(ctx.notifier.active().is_empty());
}

#[tokio::test]
async fn rejected_token_logs_out_and_redirects() {
    let server = MockServer::start().await;
    mount_screening(&server, two_seats()).await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let ctx = signed_in(&server, user(7, false));

    let mut page = SeatBookingPage::new(ctx.clone(), 3, Some(41));
    page.load().await.unwrap();
    page.toggle_seat(1);

    let outcome = page.submit_booking().await.unwrap();
    assert_eq!(outcome, BookingOutcome::LoginRequired(Route::Login { session_expired: true }));
    assert!(!ctx.session.is_authenticated());
}

#[tokio::test]
async fn missing_screening_leaves_price_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/screenings/41/seats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_seats()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/screenings/41"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let ctx = anonymous(&server);

    let mut page = SeatBookingPage::new(ctx.clone(), 3, Some(41));
    assert!(page.load().await.is_err());

    assert_eq!(page.seats().len(), 2);
    assert!(page.toggle_seat(1));
    assert_eq!(page.ticket_price(), None);
    assert_eq!(page.total(), 0.0);
    assert_eq!(messages(&ctx), ["Failed to load screening"]);
}

#[tokio::test]
async fn malformed_seat_payload_is_rejected() {
    let server = MockServer::start().await;
    mount_screening(&server, json!([{ "id": 1, "row": "", "number": 0, "taken": false }])).await;
    let ctx = anonymous(&server);

    let mut page = SeatBookingPage::new(ctx.clone(), 3, Some(41));
    let err = page.load().await.unwrap_err();

    assert!(err.is_malformed());
    assert!(page.seats().is_empty());
    assert_eq!(messages(&ctx), ["Failed to load seats"]);
}

#[tokio::test]
async fn oversized_seat_number_is_rejected() {
    let server = MockServer::start().await;
    mount_screening(&server, json!([seat(1, "A", 1, false), seat(2, "A", 2_000_000_000, false)])).await;
    let ctx = anonymous(&server);

    let mut page = SeatBookingPage::new(ctx.clone(), 3, Some(41));
    let err = page.load().await.unwrap_err();

    assert!(matches!(err, ClientError::Schema { .. }));
    assert!(page.seats().is_empty());
    assert_eq!(messages(&ctx), ["Failed to load seats"]);
}

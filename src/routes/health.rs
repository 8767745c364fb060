use rocket::{http::Status, routes};

#[rocket::get("/")]
pub async fn healthcheck() -> Status {
    Status::Ok
}

pub fn routes() -> Vec<rocket::Route> {
    routes![healthcheck]
}

#[cfg(test)]
mod tests {
    use rocket::http::Status;
    use rocket::local::asynchronous::Client;

    #[rocket::async_test]
    async fn health_check_works() {
        let rocket = rocket::build().mount("/health", super::routes());
        let client = Client::tracked(rocket).await.expect("valid rocket instance");
        let response = client.get("/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
    }
}

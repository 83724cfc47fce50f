use super::*;

#[tokio::test]
async fn free_port_passes_the_guard() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    assert!(check(port).await.is_ok());
}

#[tokio::test]
async fn occupied_port_fails_the_guard() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let _keep_alive = tokio::spawn(async move {
        loop {
            if listener.accept().await.is_err() {
                break;
            }
        }
    });

    assert!(matches!(check(port).await, Err(SingleInstanceError::AlreadyRunning)));
}

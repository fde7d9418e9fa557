use htorrent_test_helpers::configuration;

use crate::common::logging;
use crate::servers::gateway::client::Client;
use crate::servers::gateway::Started;

async fn start_gateway() -> (Started, Client) {
    logging::init();

    let env = Started::new(&configuration::ephemeral().into()).await;
    let client = Client::new(env.bind_address().await);

    (env, client)
}

mod for_the_gateway_lifecycle {
    use std::sync::Arc;

    use htorrent::core::swarm::Protocols;
    use htorrent_test_helpers::configuration;

    use super::start_gateway;
    use crate::servers::gateway::Started;

    #[tokio::test]
    async fn it_should_be_closed_more_than_once() {
        let (env, _client) = start_gateway().await;

        env.gateway.close().await.unwrap();
        env.gateway.close().await.unwrap();

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn waiting_should_return_once_the_gateway_is_closed() {
        let (env, _client) = start_gateway().await;

        let gateway = &env.gateway;

        let (waited, closed) = tokio::join!(gateway.wait(), gateway.close());

        waited.unwrap();
        closed.unwrap();
    }

    #[tokio::test]
    async fn it_should_start_the_swarm_client_with_both_protocols_when_none_of_the_configured_ones_is_valid() {
        let mut config = configuration::ephemeral();
        config.swarm.protocols = vec!["quic".to_owned()];

        let env = Started::new(&Arc::new(config)).await;

        let options = env.engine.started_with().unwrap();

        assert_eq!(options.protocols, Protocols { tcp: true, utp: true });
        assert!(!options.dht);

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_create_the_download_directory() {
        let config = Arc::new(configuration::ephemeral_with_download_dir());

        let env = Started::new(&config).await;

        assert!(config.swarm.download_dir().is_dir());

        env.stop().await.unwrap();
    }
}

mod receiving_a_health_check_request {
    use htorrent::servers::gateway::resources::{Report, Status};

    use super::start_gateway;

    #[tokio::test]
    async fn it_should_return_status_ok() {
        let (env, client) = start_gateway().await;

        let response = client.health_check().await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.json::<Report>().await.unwrap(), Report { status: Status::Ok });

        env.stop().await.unwrap();
    }
}

mod receiving_an_info_request {
    use std::sync::Arc;
    use std::time::Duration;

    use htorrent_primitives::info::{File, Info};
    use htorrent_test_helpers::{configuration, random};

    use super::start_gateway;
    use crate::common::fixtures::{random_info_hash, sample_torrent, CREATION_DATE, DESCRIPTION, VIDEO_LENGTH};
    use crate::servers::gateway::asserts::assert_unprocessable_entity;
    use crate::servers::gateway::client::Client;
    use crate::servers::gateway::Started;

    #[tokio::test]
    async fn it_should_fail_without_joining_a_swarm_when_the_magnet_link_is_missing() {
        let (env, client) = start_gateway().await;

        let response = client.get("info", &[]).await;

        assert_unprocessable_entity(response, "missing the magnet link").await;
        assert_eq!(env.engine.joins(), 0);

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_return_the_torrent_name_files_and_description() {
        let (env, client) = start_gateway().await;

        let seed = env.engine.seed(sample_torrent(random::bytes(VIDEO_LENGTH)));
        seed.release_metadata();
        seed.download_all();

        let response = client.info(&seed.magnet()).await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
        assert_eq!(
            response.json::<Info>().await.unwrap(),
            Info {
                name: "Sintel".to_owned(),
                info_hash: seed.info_hash(),
                creation_date: CREATION_DATE,
                description: DESCRIPTION.to_owned(),
                files: vec![
                    File::new("Sintel/Sintel.txt".to_owned(), DESCRIPTION.len() as u64),
                    File::new("Sintel/Sintel.mp4".to_owned(), VIDEO_LENGTH as u64),
                ],
            }
        );

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_time_out_when_the_metadata_does_not_arrive_before_the_deadline() {
        let mut config = configuration::ephemeral();
        config.gateway.metadata_timeout = Some(1);

        let env = Started::new(&Arc::new(config)).await;
        let client = Client::new(env.bind_address().await);

        let magnet = format!("magnet:?xt=urn:btih:{}", random_info_hash());

        let response = tokio::time::timeout(Duration::from_secs(10), client.info(&magnet))
            .await
            .expect("the gateway should give up waiting for the metadata");

        assert_eq!(response.status(), 504);

        env.stop().await.unwrap();
    }
}

mod receiving_a_metrics_request {
    use htorrent_primitives::metrics::{FileMetrics, TorrentMetrics};
    use htorrent_test_helpers::random;

    use super::start_gateway;
    use crate::common::fixtures::{sample_torrent, DESCRIPTION, VIDEO_LENGTH};

    #[tokio::test]
    async fn it_should_return_an_empty_list_when_no_swarm_was_joined() {
        let (env, client) = start_gateway().await;

        let response = client.metrics().await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.json::<Vec<TorrentMetrics>>().await.unwrap(), vec![]);

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_return_the_progress_of_the_joined_swarms() {
        let (env, client) = start_gateway().await;

        let seed = env.engine.seed(sample_torrent(random::bytes(VIDEO_LENGTH)));
        seed.release_metadata();
        seed.download("Sintel/Sintel.txt", DESCRIPTION.len() as u64);
        seed.download("Sintel/Sintel.mp4", 1024);
        seed.set_peers(3);

        assert_eq!(client.info(&seed.magnet()).await.status(), 200);

        let response = client.metrics().await;

        assert_eq!(response.status(), 200);

        let metrics = response.json::<Vec<TorrentMetrics>>().await.unwrap();

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].info_hash, seed.info_hash());
        assert!(metrics[0].magnet.starts_with("magnet:?xt=urn:btih:"));
        assert_eq!(metrics[0].peers, 3);
        assert_eq!(
            metrics[0].files,
            vec![
                FileMetrics::new("Sintel/Sintel.txt".to_owned(), DESCRIPTION.len() as u64, DESCRIPTION.len() as u64),
                FileMetrics::new("Sintel/Sintel.mp4".to_owned(), VIDEO_LENGTH as u64, 1024),
            ]
        );

        env.stop().await.unwrap();
    }
}

mod receiving_a_stream_request {
    use std::time::Duration;

    use htorrent_test_helpers::random;

    use super::start_gateway;
    use crate::common::fixtures::{sample_torrent, VIDEO_LENGTH};
    use crate::servers::gateway::asserts::{assert_header, assert_not_found, assert_unprocessable_entity};

    const VIDEO: &str = "Sintel/Sintel.mp4";

    #[tokio::test]
    async fn it_should_fail_without_joining_a_swarm_when_the_path_is_missing() {
        let (env, client) = start_gateway().await;

        let seed = env.engine.seed(sample_torrent(random::bytes(VIDEO_LENGTH)));
        let magnet = seed.magnet();

        let response = client.get("stream", &[("magnet", magnet.as_str())]).await;

        assert_unprocessable_entity(response, "missing the path of the file").await;
        assert_eq!(env.engine.joins(), 0);

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_fail_when_the_torrent_does_not_have_the_file() {
        let (env, client) = start_gateway().await;

        let seed = env.engine.seed(sample_torrent(random::bytes(VIDEO_LENGTH)));
        seed.release_metadata();

        let response = client.stream(&seed.magnet(), "Sintel/Sintel.mkv").await;

        assert_not_found(response, "does not have a file with path").await;

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_return_the_whole_file() {
        let (env, client) = start_gateway().await;

        let video = random::bytes(VIDEO_LENGTH);
        let seed = env.engine.seed(sample_torrent(video.clone()));
        seed.release_metadata();
        seed.download_all();

        let response = client.stream(&seed.magnet(), VIDEO).await;

        assert_eq!(response.status(), 200);
        assert_header(&response, "accept-ranges", "bytes");
        assert_header(&response, "content-type", "video/mp4");
        assert_header(&response, "content-length", &VIDEO_LENGTH.to_string());
        assert_header(&response, "last-modified", "Thu, 30 Mar 2017 23:30:01 GMT");
        assert_eq!(response.bytes().await.unwrap().to_vec(), video);

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_return_the_requested_range() {
        let (env, client) = start_gateway().await;

        let video = random::bytes(VIDEO_LENGTH);
        let seed = env.engine.seed(sample_torrent(video.clone()));
        seed.release_metadata();
        seed.download(VIDEO, 2048);

        let response = client.stream_with_header(&seed.magnet(), VIDEO, "range", "bytes=1024-2047").await;

        assert_eq!(response.status(), 206);
        assert_header(&response, "content-range", &format!("bytes 1024-2047/{VIDEO_LENGTH}"));
        assert_header(&response, "content-length", "1024");
        assert_eq!(response.bytes().await.unwrap().to_vec(), video[1024..2048].to_vec());

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_return_the_whole_file_when_more_than_one_range_is_requested() {
        let (env, client) = start_gateway().await;

        let video = random::bytes(VIDEO_LENGTH);
        let seed = env.engine.seed(sample_torrent(video.clone()));
        seed.release_metadata();
        seed.download_all();

        let response = client
            .stream_with_header(&seed.magnet(), VIDEO, "range", "bytes=0-99,1024-2047")
            .await;

        assert_eq!(response.status(), 200);
        assert!(response.headers().get("content-range").is_none());
        assert_header(&response, "content-length", &VIDEO_LENGTH.to_string());
        assert_eq!(response.bytes().await.unwrap().to_vec(), video);

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_reject_a_range_starting_after_the_end_of_the_file() {
        let (env, client) = start_gateway().await;

        let seed = env.engine.seed(sample_torrent(random::bytes(VIDEO_LENGTH)));
        seed.release_metadata();

        let range = format!("bytes={VIDEO_LENGTH}-");
        let response = client.stream_with_header(&seed.magnet(), VIDEO, "range", &range).await;

        assert_eq!(response.status(), 416);
        assert_header(&response, "content-range", &format!("bytes */{VIDEO_LENGTH}"));

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_not_return_the_file_when_it_was_not_modified() {
        let (env, client) = start_gateway().await;

        let seed = env.engine.seed(sample_torrent(random::bytes(VIDEO_LENGTH)));
        seed.release_metadata();

        let response = client
            .stream_with_header(&seed.magnet(), VIDEO, "if-modified-since", "Thu, 30 Mar 2017 23:30:01 GMT")
            .await;

        assert_eq!(response.status(), 304);

        env.stop().await.unwrap();
    }

    #[tokio::test]
    async fn it_should_report_the_download_progress_of_the_streamed_file() {
        let (env, client) = start_gateway().await;

        let seed = env.engine.seed(sample_torrent(random::bytes(VIDEO_LENGTH)));
        seed.release_metadata();
        seed.download(VIDEO, 1024);
        seed.set_peers(2);

        let response = client.stream_with_header(&seed.magnet(), VIDEO, "range", "bytes=0-1023").await;

        assert_eq!(response.status(), 206);
        assert_eq!(response.bytes().await.unwrap().len(), 1024);

        tokio::time::timeout(Duration::from_secs(5), async {
            while env.sink.events().is_empty() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("a progress event should be reported");

        let (torrent, file) = env.sink.events()[0].clone();

        assert_eq!(torrent.magnet, seed.magnet());
        assert_eq!(torrent.info_hash, seed.info_hash());
        assert_eq!(torrent.peers, 2);
        assert!(torrent.files.is_empty());
        assert_eq!(file.path, VIDEO);
        assert_eq!(file.length, VIDEO_LENGTH as u64);
        assert_eq!(file.completed, 1024);

        assert_eq!(env.gateway.active_reporters(), 1);

        env.stop().await.unwrap();
    }
}

#[tokio::test]
async fn it_should_return_not_found_for_unknown_routes() {
    let (env, client) = start_gateway().await;

    let response = client.get("announce", &[]).await;

    assert_eq!(response.status(), 404);

    env.stop().await.unwrap();
}

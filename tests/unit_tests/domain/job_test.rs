use saraphi::domain::{Destination, Job, JobStatus};

#[test]
fn given_new_job_when_created_then_it_is_pending_with_no_result_fields() {
    let job = Job::new(
        "m1".to_string(),
        Destination::User {
            user_id: "u1".to_string(),
        },
    );

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.retry_count, 0);
    assert!(job.previous_job_id.is_none());
    assert!(job.transcript.is_none());
    assert!(job.completed_at.is_none());
}

#[test]
fn given_abandoned_job_when_retried_then_successor_links_back_and_increments_count() {
    let mut abandoned = Job::new(
        "m1".to_string(),
        Destination::User {
            user_id: "u1".to_string(),
        },
    );
    abandoned.retry_count = 2;

    let successor = Job::retry_of(&abandoned);

    assert_eq!(successor.retry_count, 3);
    assert_eq!(successor.previous_job_id, Some(abandoned.id));
    assert_eq!(successor.message_id, abandoned.message_id);
    assert_eq!(successor.destination, abandoned.destination);
    assert_eq!(successor.status, JobStatus::Pending);
    assert_ne!(successor.id, abandoned.id);
}

#[test]
fn given_every_status_when_round_tripped_through_strings_then_value_is_preserved() {
    for status in [
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Timeout,
    ] {
        assert_eq!(status.as_str().parse::<JobStatus>(), Ok(status));
    }
    assert!("QUEUED".parse::<JobStatus>().is_err());
}

#[test]
fn given_statuses_when_classified_then_only_active_ones_are_non_terminal() {
    assert!(!JobStatus::Pending.is_terminal());
    assert!(!JobStatus::Processing.is_terminal());
    assert!(JobStatus::Completed.is_terminal());
    assert!(JobStatus::Failed.is_terminal());
    assert!(JobStatus::Timeout.is_terminal());
}

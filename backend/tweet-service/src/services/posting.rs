/// Tweet submission: optional media upload, then one create-tweet call.
use tracing::info;
use twitter_client::{CreatedTweet, Credentials, TwitterApi};

use crate::error::Result;
use crate::uploads::PostSubmission;

pub struct PostService<'a> {
    twitter: &'a dyn TwitterApi,
}

impl<'a> PostService<'a> {
    pub fn new(twitter: &'a dyn TwitterApi) -> Self {
        Self { twitter }
    }

    /// Post `submission` as the user owning `credentials`.
    ///
    /// With an image: upload it, then create the tweet referencing the
    /// returned media id. Without: create the tweet alone.
    pub async fn submit_post(
        &self,
        credentials: &Credentials,
        submission: &PostSubmission,
    ) -> Result<CreatedTweet> {
        let media_ids = match &submission.image {
            Some(image) => {
                let media_id = self
                    .twitter
                    .upload_media(credentials, &image.path, &image.mime_type)
                    .await?;
                vec![media_id]
            }
            None => Vec::new(),
        };

        let tweet = self
            .twitter
            .create_tweet(credentials, &submission.status, &media_ids)
            .await?;

        info!(tweet_id = %tweet.id, text = %tweet.text, media_ids = ?media_ids, "Post tweet response");
        Ok(tweet)
    }
}

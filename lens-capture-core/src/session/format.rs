use crate::traits::media_encoder::MediaEncoderFactory;

/// First MIME type in `preferences` the encoder factory claims to support.
pub fn select_mime_type(
    encoders: &dyn MediaEncoderFactory,
    preferences: &[String],
) -> Option<String> {
    preferences
        .iter()
        .find(|mime_type| encoders.is_type_supported(mime_type))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::RecorderSettings;
    use crate::test_support::FakeEncoderFactory;

    #[test]
    fn picks_first_supported_in_preference_order() {
        let factory = FakeEncoderFactory::supporting(&["video/webm", "video/webm;codecs=vp8"]);
        let prefs = RecorderSettings::default().codec_preferences;

        assert_eq!(
            select_mime_type(&factory, &prefs).as_deref(),
            Some("video/webm;codecs=vp8")
        );
        // Stops querying once a match is found.
        assert_eq!(
            factory.trace.lock().queried,
            vec![
                "video/webm;codecs=vp9",
                "video/webm;codecs=h264",
                "video/webm;codecs=vp8"
            ]
        );
    }

    #[test]
    fn none_when_nothing_supported() {
        let factory = FakeEncoderFactory::supporting(&["video/mp4"]);
        let prefs = RecorderSettings::default().codec_preferences;

        assert!(select_mime_type(&factory, &prefs).is_none());
    }
}

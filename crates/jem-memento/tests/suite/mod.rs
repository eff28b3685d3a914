mod decoding;
mod props;
mod round_trip;
